#![deny(missing_docs)]
#![doc = "Filter-and-aggregate pipeline producing recruitment funnel stage totals, breakdowns and conversion rates."]

/// Per-dimension stage breakdowns.
pub mod breakdown;
/// Filter specification and the record filter.
pub mod filters;
/// Canonical hashing helpers.
pub mod hash;
pub mod ingest;
/// Single-slot snapshot memoization.
pub mod memo;
/// Stage totals and conversion rates.
pub mod metrics;
/// Fixed-precision percentages.
pub mod percent;
/// Canonical JSON and YAML serde helpers.
pub mod serde;
/// Full pipeline assembly.
pub mod snapshot;
/// Stage predicate table.
pub mod stages;

pub use breakdown::{
    build_breakdown, build_stage_breakdowns, Breakdown, BreakdownEntry, Dimension,
    StageBreakdowns, UNKNOWN_LABEL,
};
pub use filters::{
    filter, load_filters, DimensionFilter, ExperienceBucket, ExperienceFilter, FilterOptions,
    FilterSpec,
};
pub use ingest::{load_records, records_from_csv, RecordFormat};
pub use memo::SnapshotMemo;
pub use metrics::{compute_stage_metrics, ConversionRates, StageMetrics, StageTotals};
pub use percent::Percentage;
pub use snapshot::{compute_snapshot, MetricsSnapshot, StageSnapshot};
pub use stages::{Stage, StageDefinition, STAGES};

pub use funnel_core::{CandidateRecord, ErrorInfo, FunnelError, Presence};
