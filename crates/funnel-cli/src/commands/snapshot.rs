use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use funnel_core::lenient::parse_date;
use funnel_engine::{
    compute_snapshot, load_filters, load_records, DimensionFilter, ExperienceFilter, FilterSpec,
};

use super::emit_json;

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Record file (JSON array or CSV with a header row).
    #[arg(long)]
    pub records: PathBuf,
    /// Filter specification (YAML or JSON); no filtering when omitted.
    #[arg(long)]
    pub filters: Option<PathBuf>,
    /// Only keep records from this platform.
    #[arg(long)]
    pub platform: Option<String>,
    /// Only keep records assigned to this team member.
    #[arg(long)]
    pub assign_to: Option<String>,
    /// Only keep records for this position.
    #[arg(long)]
    pub position: Option<String>,
    /// Experience bucket: `Fresher`, `1-3 years`, `3-5 years` or `5+ years`.
    #[arg(long)]
    pub experience: Option<String>,
    /// Earliest apply day, `YYYY-MM-DD`.
    #[arg(long)]
    pub date_from: Option<String>,
    /// Latest apply day, `YYYY-MM-DD`.
    #[arg(long)]
    pub date_to: Option<String>,
    /// Destination file; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

impl SnapshotArgs {
    /// Loads the filter file, then applies any command-line overrides.
    fn filter_spec(&self) -> Result<FilterSpec, Box<dyn Error>> {
        let mut spec = match &self.filters {
            Some(path) => load_filters(path)?,
            None => FilterSpec::default(),
        };
        if let Some(platform) = &self.platform {
            spec.platform = DimensionFilter::from(Some(platform.clone()));
        }
        if let Some(assignee) = &self.assign_to {
            spec.assign_to = DimensionFilter::from(Some(assignee.clone()));
        }
        if let Some(position) = &self.position {
            spec.position = DimensionFilter::from(Some(position.clone()));
        }
        if let Some(bucket) = &self.experience {
            spec.experience = ExperienceFilter::from(Some(bucket.clone()));
        }
        if let Some(raw) = &self.date_from {
            spec.date_from = lenient_bound(raw);
        }
        if let Some(raw) = &self.date_to {
            spec.date_to = lenient_bound(raw);
        }
        Ok(spec)
    }
}

fn lenient_bound(raw: &str) -> Option<NaiveDate> {
    let parsed = parse_date(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        tracing::warn!(value = raw, "ignoring unparsable date bound");
    }
    parsed
}

pub fn run(args: &SnapshotArgs) -> Result<(), Box<dyn Error>> {
    let records = load_records(&args.records)?;
    let spec = args.filter_spec()?;
    let snapshot = compute_snapshot(&records, &spec);
    tracing::info!(
        total = snapshot.total_records,
        filtered = snapshot.filtered_records,
        active_filters = spec.active_count(),
        "computed funnel snapshot"
    );
    emit_json(&snapshot, args.out.as_deref(), args.pretty)
}
