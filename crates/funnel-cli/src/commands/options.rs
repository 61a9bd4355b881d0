use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use funnel_engine::{load_records, FilterOptions};

use super::emit_json;

#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Record file (JSON array or CSV with a header row).
    #[arg(long)]
    pub records: PathBuf,
    /// Destination file; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: &OptionsArgs) -> Result<(), Box<dyn Error>> {
    let records = load_records(&args.records)?;
    let options = FilterOptions::from_records(&records);
    emit_json(&options, args.out.as_deref(), args.pretty)
}
