//! Record loaders for exported recruitment sheets.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use funnel_core::errors::{ErrorInfo, FunnelError};
use funnel_core::CandidateRecord;

use crate::serde::from_json_slice;

/// On-disk encodings accepted for record files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// A JSON array of records.
    Json,
    /// A CSV file with a header row.
    Csv,
}

impl RecordFormat {
    /// Picks the format from a file extension; anything but `csv` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => RecordFormat::Csv,
            _ => RecordFormat::Json,
        }
    }
}

fn ingest_error(code: &str, path: &Path, err: impl ToString) -> FunnelError {
    FunnelError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Loads records from a JSON or CSV file, chosen by extension.
pub fn load_records(path: &Path) -> Result<Vec<CandidateRecord>, FunnelError> {
    let records = match RecordFormat::from_path(path) {
        RecordFormat::Json => {
            let bytes =
                fs::read(path).map_err(|err| ingest_error("funnel.ingest.read", path, err))?;
            from_json_slice(&bytes)?
        }
        RecordFormat::Csv => {
            let file =
                File::open(path).map_err(|err| ingest_error("funnel.ingest.open", path, err))?;
            records_from_csv(file)?
        }
    };
    tracing::debug!(path = %path.display(), records = records.len(), "loaded candidate records");
    Ok(records)
}

/// Decodes records from CSV with a camelCase header row.
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, FunnelError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut records = Vec::new();
    for (idx, row) in csv_reader.deserialize::<CandidateRecord>().enumerate() {
        let record = row.map_err(|err| {
            let mut info = ErrorInfo::new("funnel.ingest.csv", err.to_string())
                .with_context("row", (idx + 1).to_string());
            if let Some(position) = err.position() {
                info = info.with_context("line", position.line().to_string());
            }
            FunnelError::Decode(info)
        })?;
        records.push(record);
    }
    Ok(records)
}
