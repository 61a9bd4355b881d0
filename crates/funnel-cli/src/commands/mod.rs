pub mod options;
pub mod snapshot;

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use funnel_engine::serde::{to_canonical_json_bytes, to_pretty_json_bytes};
use serde::Serialize;

/// Writes `value` as JSON to `out`, or to stdout when no path is given.
pub fn emit_json<T: Serialize>(
    value: &T,
    out: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn Error>> {
    let mut bytes = if pretty {
        to_pretty_json_bytes(value)?
    } else {
        to_canonical_json_bytes(value)?
    };
    bytes.push(b'\n');
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &bytes)?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
