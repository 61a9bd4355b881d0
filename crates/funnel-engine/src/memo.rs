use funnel_core::CandidateRecord;

use crate::filters::FilterSpec;
use crate::snapshot::{compute_snapshot, MetricsSnapshot};

#[derive(Debug, Clone)]
struct MemoEntry {
    records_version: u64,
    spec: FilterSpec,
    snapshot: MetricsSnapshot,
}

impl MemoEntry {
    fn is_for(&self, records_version: u64, spec: &FilterSpec) -> bool {
        self.records_version == records_version && self.spec == *spec
    }
}

/// Single-slot cache of the last snapshot keyed on `(records_version, spec)`.
///
/// The caller bumps `records_version` whenever the record collection changes.
/// Any key change recomputes the snapshot in full.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMemo {
    entry: Option<MemoEntry>,
}

impl SnapshotMemo {
    /// Creates an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the key matches the cached snapshot.
    pub fn is_cached(&self, records_version: u64, spec: &FilterSpec) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| entry.is_for(records_version, spec))
    }

    /// Returns the cached snapshot for the key, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        records_version: u64,
        records: &[CandidateRecord],
        spec: &FilterSpec,
    ) -> &MetricsSnapshot {
        let entry = match self.entry.take() {
            Some(entry) if entry.is_for(records_version, spec) => entry,
            _ => {
                tracing::debug!(records_version, "recomputing funnel snapshot");
                MemoEntry {
                    records_version,
                    spec: spec.clone(),
                    snapshot: compute_snapshot(records, spec),
                }
            }
        };
        &self.entry.insert(entry).snapshot
    }

    /// Drops the cached snapshot.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::DimensionFilter;

    fn records() -> Vec<CandidateRecord> {
        vec![
            CandidateRecord {
                platform: Some("A".into()),
                apply_date: Some("x".into()),
                ..CandidateRecord::default()
            },
            CandidateRecord {
                platform: Some("B".into()),
                ..CandidateRecord::default()
            },
        ]
    }

    #[test]
    fn hit_requires_same_version_and_spec() {
        let records = records();
        let mut memo = SnapshotMemo::new();
        let spec = FilterSpec::default();
        assert!(!memo.is_cached(1, &spec));
        let first = memo.get_or_compute(1, &records, &spec).clone();
        assert!(memo.is_cached(1, &spec));
        assert!(!memo.is_cached(2, &spec));

        let narrowed = FilterSpec {
            platform: DimensionFilter::equals("B"),
            ..FilterSpec::default()
        };
        assert!(!memo.is_cached(1, &narrowed));
        let second = memo.get_or_compute(1, &records, &narrowed).clone();
        assert_ne!(first, second);
        assert!(memo.is_cached(1, &narrowed));
        assert!(!memo.is_cached(1, &spec));

        memo.clear();
        assert!(!memo.is_cached(1, &narrowed));
    }

    #[test]
    fn cached_value_matches_fresh_computation() {
        let records = records();
        let spec = FilterSpec::default();
        let mut memo = SnapshotMemo::new();
        memo.get_or_compute(7, &records, &spec);
        let cached = memo.get_or_compute(7, &records, &spec).clone();
        assert_eq!(cached, compute_snapshot(&records, &spec));
    }
}
