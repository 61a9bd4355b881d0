use funnel_core::errors::FunnelError;
use funnel_core::CandidateRecord;
use serde::{Deserialize, Serialize};

use crate::breakdown::{build_stage_breakdowns, Breakdown, Dimension, StageBreakdowns};
use crate::filters::{filter, FilterSpec};
use crate::hash::stable_hash_string;
use crate::metrics::{compute_stage_metrics, ConversionRates, StageTotals};
use crate::stages::Stage;

/// One funnel stage with its total and dimension breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSnapshot {
    /// Stage identifier.
    pub stage: Stage,
    /// Number of filtered records that reached the stage.
    pub total: usize,
    /// Breakdowns of those records by platform, position and assignee.
    pub breakdowns: StageBreakdowns,
}

/// Complete aggregate result for one `(records, filters)` input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Size of the unfiltered input.
    pub total_records: usize,
    /// Size of the filtered subset.
    pub filtered_records: usize,
    /// Per-stage results in funnel order.
    pub stages: Vec<StageSnapshot>,
    /// Conversion rates between stages.
    pub rates: ConversionRates,
}

impl MetricsSnapshot {
    /// Result for a single stage.
    pub fn stage(&self, stage: Stage) -> Option<&StageSnapshot> {
        self.stages.iter().find(|snapshot| snapshot.stage == stage)
    }

    /// Breakdown for a stage and dimension.
    pub fn breakdown(&self, stage: Stage, dimension: Dimension) -> Option<&Breakdown> {
        self.stage(stage)
            .map(|snapshot| snapshot.breakdowns.get(dimension))
    }

    /// Stage totals gathered into one struct.
    pub fn totals(&self) -> StageTotals {
        let mut totals = StageTotals::default();
        for snapshot in &self.stages {
            match snapshot.stage {
                Stage::Clicked => totals.clicked = snapshot.total,
                Stage::FormFilled => totals.form_filled = snapshot.total,
                Stage::AudioSubmitted => totals.audio_submitted = snapshot.total,
                Stage::EligibilitySubmitted => totals.eligibility_submitted = snapshot.total,
                Stage::Hired => totals.hired = snapshot.total,
            }
        }
        totals
    }

    /// SHA256 of the canonical JSON encoding.
    pub fn fingerprint(&self) -> Result<String, FunnelError> {
        stable_hash_string(self)
    }
}

/// Runs the full pipeline: filter, stage totals, rates, and fifteen breakdowns.
pub fn compute_snapshot(records: &[CandidateRecord], spec: &FilterSpec) -> MetricsSnapshot {
    let filtered = filter(records, spec);
    let metrics = compute_stage_metrics(filtered.iter().copied());
    let stages = Stage::ALL
        .into_iter()
        .map(|stage| StageSnapshot {
            stage,
            total: metrics.totals.get(stage),
            breakdowns: build_stage_breakdowns(&filtered, stage),
        })
        .collect();
    MetricsSnapshot {
        total_records: records.len(),
        filtered_records: filtered.len(),
        stages,
        rates: metrics.rates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::DimensionFilter;

    fn candidate(platform: &str, clicked: bool, hired: bool) -> CandidateRecord {
        CandidateRecord {
            platform: Some(platform.to_string()),
            apply_date: clicked.then(|| "2024-01-01".to_string()),
            joined: hired.then(|| "yes".to_string()),
            ..CandidateRecord::default()
        }
    }

    #[test]
    fn snapshot_covers_every_stage_and_dimension() {
        let records = vec![
            candidate("A", true, true),
            candidate("B", true, false),
            candidate("A", false, false),
        ];
        let snapshot = compute_snapshot(&records, &FilterSpec::default());
        assert_eq!(snapshot.total_records, 3);
        assert_eq!(snapshot.filtered_records, 3);
        assert_eq!(snapshot.stages.len(), 5);
        for stage in Stage::ALL {
            for dimension in Dimension::ALL {
                let breakdown = snapshot.breakdown(stage, dimension).expect("breakdown");
                assert_eq!(breakdown.total(), snapshot.totals().get(stage));
            }
        }
        assert_eq!(snapshot.rates.overall.to_string(), "50.0");
    }

    #[test]
    fn filtered_count_reflects_spec() {
        let records = vec![candidate("A", true, true), candidate("B", true, false)];
        let spec = FilterSpec {
            platform: DimensionFilter::equals("B"),
            ..FilterSpec::default()
        };
        let snapshot = compute_snapshot(&records, &spec);
        assert_eq!(snapshot.filtered_records, 1);
        assert_eq!(snapshot.totals().hired, 0);
        assert_eq!(snapshot.rates.overall.to_string(), "0.0");
    }

    #[test]
    fn fingerprint_is_stable() {
        let records = vec![candidate("A", true, true)];
        let first = compute_snapshot(&records, &FilterSpec::default());
        let second = compute_snapshot(&records, &FilterSpec::default());
        assert_eq!(
            first.fingerprint().expect("hash"),
            second.fingerprint().expect("hash")
        );
    }
}
