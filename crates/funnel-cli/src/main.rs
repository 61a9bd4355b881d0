use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    options::{self, OptionsArgs},
    snapshot::{self, SnapshotArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "funnel", about = "Recruitment funnel metrics CLI", version)]
struct Cli {
    /// Log filter directive; overrides RUST_LOG (e.g. `debug`, `funnel_engine=trace`).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter a record file and emit stage totals, breakdowns and conversion rates.
    Snapshot(SnapshotArgs),
    /// List the selectable filter values present in a record file.
    Options(OptionsArgs),
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());
    match cli.command {
        Command::Snapshot(args) => snapshot::run(&args),
        Command::Options(args) => options::run(&args),
    }
}
