use std::collections::HashSet;
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use funnel_core::errors::{ErrorInfo, FunnelError};
use funnel_core::{lenient, CandidateRecord};
use serde::{Deserialize, Serialize};

use crate::serde::{from_json_slice, from_yaml_slice};

/// Legacy "no filter" sentinel accepted when decoding saved filter states.
pub const ALL_SENTINEL: &str = "all";

/// Exact-match constraint on one record dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum DimensionFilter {
    /// Every record passes.
    #[default]
    NoFilter,
    /// Only records whose field equals this value pass.
    Equals(String),
}

impl DimensionFilter {
    /// Shorthand for [`DimensionFilter::Equals`].
    pub fn equals(value: impl Into<String>) -> Self {
        DimensionFilter::Equals(value.into())
    }

    /// Whether the constraint narrows anything.
    pub fn is_active(&self) -> bool {
        matches!(self, DimensionFilter::Equals(_))
    }

    /// Tests a record's field value against the constraint.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            DimensionFilter::NoFilter => true,
            DimensionFilter::Equals(expected) => value == Some(expected.as_str()),
        }
    }
}

impl From<Option<String>> for DimensionFilter {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(value) if value != ALL_SENTINEL => DimensionFilter::Equals(value),
            _ => DimensionFilter::NoFilter,
        }
    }
}

impl From<DimensionFilter> for Option<String> {
    fn from(filter: DimensionFilter) -> Self {
        match filter {
            DimensionFilter::NoFilter => None,
            DimensionFilter::Equals(value) => Some(value),
        }
    }
}

/// Experience brackets offered by the dashboard.
///
/// Boundaries are inclusive on both ends, so 3 and 5 years fall into two
/// adjacent buckets each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperienceBucket {
    /// No experience.
    Fresher,
    /// One to three years.
    OneToThree,
    /// Three to five years.
    ThreeToFive,
    /// Five years or more.
    FivePlus,
}

impl ExperienceBucket {
    /// All buckets in display order.
    pub const ALL: [ExperienceBucket; 4] = [
        ExperienceBucket::Fresher,
        ExperienceBucket::OneToThree,
        ExperienceBucket::ThreeToFive,
        ExperienceBucket::FivePlus,
    ];

    /// Display label, also the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            ExperienceBucket::Fresher => "Fresher",
            ExperienceBucket::OneToThree => "1-3 years",
            ExperienceBucket::ThreeToFive => "3-5 years",
            ExperienceBucket::FivePlus => "5+ years",
        }
    }

    /// Looks a bucket up by its label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.label() == label)
    }

    /// Whether the given years of experience fall inside the bucket.
    pub fn contains(self, years: f64) -> bool {
        match self {
            ExperienceBucket::Fresher => years <= 0.0,
            ExperienceBucket::OneToThree => (1.0..=3.0).contains(&years),
            ExperienceBucket::ThreeToFive => (3.0..=5.0).contains(&years),
            ExperienceBucket::FivePlus => years >= 5.0,
        }
    }
}

impl Display for ExperienceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ExperienceBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Optional experience bucket constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ExperienceFilter {
    /// Every record passes.
    #[default]
    NoFilter,
    /// Only records inside the bucket pass.
    Bucket(ExperienceBucket),
}

impl ExperienceFilter {
    /// Whether the constraint narrows anything.
    pub fn is_active(&self) -> bool {
        matches!(self, ExperienceFilter::Bucket(_))
    }

    /// Tests a record's years of experience against the constraint.
    pub fn matches(&self, years: f64) -> bool {
        match self {
            ExperienceFilter::NoFilter => true,
            ExperienceFilter::Bucket(bucket) => bucket.contains(years),
        }
    }
}

impl From<Option<String>> for ExperienceFilter {
    fn from(value: Option<String>) -> Self {
        let Some(label) = value else {
            return ExperienceFilter::NoFilter;
        };
        if label == ALL_SENTINEL || label.is_empty() {
            return ExperienceFilter::NoFilter;
        }
        match ExperienceBucket::from_label(&label) {
            Some(bucket) => ExperienceFilter::Bucket(bucket),
            None => {
                tracing::warn!(value = %label, "ignoring unknown experience bucket");
                ExperienceFilter::NoFilter
            }
        }
    }
}

impl From<ExperienceFilter> for Option<String> {
    fn from(filter: ExperienceFilter) -> Self {
        match filter {
            ExperienceFilter::NoFilter => None,
            ExperienceFilter::Bucket(bucket) => Some(bucket.label().to_string()),
        }
    }
}

/// User-selected constraints narrowing the record collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Acquisition channel constraint.
    #[serde(default)]
    pub platform: DimensionFilter,
    /// Assignee constraint.
    #[serde(default)]
    pub assign_to: DimensionFilter,
    /// Position constraint.
    #[serde(default)]
    pub position: DimensionFilter,
    /// Experience bucket constraint.
    #[serde(default)]
    pub experience: ExperienceFilter,
    /// Inclusive lower bound on the apply day.
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the apply day.
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_to: Option<NaiveDate>,
}

impl FilterSpec {
    /// Returns true when the record satisfies every active constraint.
    pub fn matches(&self, record: &CandidateRecord) -> bool {
        self.platform.matches(record.platform.as_deref())
            && self.assign_to.matches(record.assign_to.as_deref())
            && self.position.matches(record.position.as_deref())
            && self.experience.matches(record.experience())
            && self.matches_date(record)
    }

    fn matches_date(&self, record: &CandidateRecord) -> bool {
        // Undated records are never excluded by a date range.
        let Some(day) = record.apply_day() else {
            return true;
        };
        if self.date_from.is_some_and(|from| day < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| day > to) {
            return false;
        }
        true
    }

    /// Number of constraints currently narrowing the collection.
    pub fn active_count(&self) -> usize {
        [
            self.platform.is_active(),
            self.assign_to.is_active(),
            self.position.is_active(),
            self.experience.is_active(),
            self.date_from.is_some(),
            self.date_to.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Returns true when no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

/// Narrows `records` to those matching `spec`, preserving input order.
pub fn filter<'a>(records: &'a [CandidateRecord], spec: &FilterSpec) -> Vec<&'a CandidateRecord> {
    let filtered: Vec<_> = records.iter().filter(|record| spec.matches(record)).collect();
    tracing::debug!(
        total = records.len(),
        kept = filtered.len(),
        active_filters = spec.active_count(),
        "filtered candidate records"
    );
    filtered
}

/// Selectable values for each filter control.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Distinct platforms in first-seen order.
    pub platforms: Vec<String>,
    /// Distinct assignees in first-seen order.
    pub assignees: Vec<String>,
    /// Distinct positions in first-seen order.
    pub positions: Vec<String>,
    /// Experience buckets in display order.
    pub experiences: Vec<ExperienceBucket>,
}

impl FilterOptions {
    /// Collects the distinct non-empty dimension values of `records`.
    pub fn from_records(records: &[CandidateRecord]) -> Self {
        Self {
            platforms: distinct(records, |record| record.platform.as_deref()),
            assignees: distinct(records, |record| record.assign_to.as_deref()),
            positions: distinct(records, |record| record.position.as_deref()),
            experiences: ExperienceBucket::ALL.to_vec(),
        }
    }
}

fn distinct<F>(records: &[CandidateRecord], field: F) -> Vec<String>
where
    F: Fn(&CandidateRecord) -> Option<&str>,
{
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for value in records.iter().filter_map(&field) {
        if !value.is_empty() && seen.insert(value) {
            values.push(value.to_string());
        }
    }
    values
}

fn io_error(code: &str, path: &Path, err: impl ToString) -> FunnelError {
    FunnelError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Loads a filter specification from a YAML or JSON file.
pub fn load_filters(path: &Path) -> Result<FilterSpec, FunnelError> {
    let bytes = fs::read(path).map_err(|err| io_error("funnel.filters.read", path, err))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => from_json_slice(&bytes),
        _ => from_yaml_slice(&bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(platform: &str, years: Option<f64>) -> CandidateRecord {
        CandidateRecord {
            platform: Some(platform.to_string()),
            experience_years: years,
            ..CandidateRecord::default()
        }
    }

    #[test]
    fn dimension_filter_requires_exact_match() {
        let filter = DimensionFilter::equals("LinkedIn");
        assert!(filter.matches(Some("LinkedIn")));
        assert!(!filter.matches(Some("linkedin")));
        assert!(!filter.matches(None));
        assert!(DimensionFilter::NoFilter.matches(None));
    }

    #[test]
    fn all_sentinel_decodes_to_no_filter() {
        assert_eq!(
            DimensionFilter::from(Some("all".to_string())),
            DimensionFilter::NoFilter
        );
        assert_eq!(DimensionFilter::from(None), DimensionFilter::NoFilter);
        assert_eq!(
            DimensionFilter::from(Some(String::new())),
            DimensionFilter::Equals(String::new())
        );
    }

    #[test]
    fn bucket_boundaries_overlap_at_three_and_five() {
        use ExperienceBucket::*;
        let holders = |years: f64| -> Vec<ExperienceBucket> {
            ExperienceBucket::ALL
                .into_iter()
                .filter(|bucket| bucket.contains(years))
                .collect()
        };
        assert_eq!(holders(0.0), vec![Fresher]);
        assert_eq!(holders(0.5), Vec::<ExperienceBucket>::new());
        assert_eq!(holders(1.0), vec![OneToThree]);
        assert_eq!(holders(3.0), vec![OneToThree, ThreeToFive]);
        assert_eq!(holders(4.0), vec![ThreeToFive]);
        assert_eq!(holders(5.0), vec![ThreeToFive, FivePlus]);
        assert_eq!(holders(12.0), vec![FivePlus]);
    }

    #[test]
    fn unknown_bucket_label_is_ignored() {
        assert_eq!(
            ExperienceFilter::from(Some("veteran".to_string())),
            ExperienceFilter::NoFilter
        );
        assert_eq!(
            ExperienceFilter::from(Some("3-5 years".to_string())),
            ExperienceFilter::Bucket(ExperienceBucket::ThreeToFive)
        );
    }

    #[test]
    fn active_count_tracks_each_constraint() {
        let mut spec = FilterSpec::default();
        assert_eq!(spec.active_count(), 0);
        assert!(spec.is_empty());
        spec.platform = DimensionFilter::equals("Naukri");
        spec.experience = ExperienceFilter::Bucket(ExperienceBucket::Fresher);
        spec.date_to = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(spec.active_count(), 3);
    }

    #[test]
    fn filter_keeps_input_order() {
        let records = vec![
            record("A", None),
            record("B", Some(2.0)),
            record("A", Some(7.0)),
        ];
        let spec = FilterSpec {
            platform: DimensionFilter::equals("A"),
            ..FilterSpec::default()
        };
        let kept = filter(&records, &spec);
        assert_eq!(kept, vec![&records[0], &records[2]]);
    }

    #[test]
    fn options_skip_empty_and_duplicate_values() {
        let records = vec![
            record("Naukri", None),
            record("", None),
            CandidateRecord::default(),
            record("LinkedIn", None),
            record("Naukri", None),
        ];
        let options = FilterOptions::from_records(&records);
        assert_eq!(options.platforms, vec!["Naukri", "LinkedIn"]);
        assert!(options.assignees.is_empty());
        assert_eq!(options.experiences.len(), 4);
    }

    #[test]
    fn decodes_yaml_with_legacy_sentinels() {
        let yaml = b"platform: all\nassignTo: Ravi\nexperience: 5+ years\ndateFrom: ''\ndateTo: 2024-02-10\n";
        let spec: FilterSpec = from_yaml_slice(yaml).expect("decode");
        assert_eq!(spec.platform, DimensionFilter::NoFilter);
        assert_eq!(spec.assign_to, DimensionFilter::equals("Ravi"));
        assert_eq!(
            spec.experience,
            ExperienceFilter::Bucket(ExperienceBucket::FivePlus)
        );
        assert_eq!(spec.date_from, None);
        assert_eq!(spec.date_to, NaiveDate::from_ymd_opt(2024, 2, 10));
    }
}
