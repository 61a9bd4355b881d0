//! Structured error types shared across funnel crates.
//!
//! The aggregation pipeline itself never fails. These errors only surface at
//! the edges: reading record files, decoding filter specifications and
//! producing canonical encodings.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`FunnelError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, line numbers, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the funnel crates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FunnelError {
    /// Filesystem access failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Malformed record or filter payloads.
    #[error("decode error: {0}")]
    Decode(ErrorInfo),
    /// Serialization and canonical encoding errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl FunnelError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FunnelError::Io(info) | FunnelError::Decode(info) | FunnelError::Serde(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_context_in_key_order() {
        let err = FunnelError::Decode(
            ErrorInfo::new("funnel.ingest.csv", "bad row")
                .with_context("path", "records.csv")
                .with_context("line", "4")
                .with_hint("check the header row"),
        );
        assert_eq!(
            err.to_string(),
            "decode error: bad row (code: funnel.ingest.csv) | context: [line=4, path=records.csv] | hint: check the header row"
        );
        assert_eq!(err.code(), "funnel.ingest.csv");
    }

    #[test]
    fn serializes_with_family_tag() {
        let err = FunnelError::Io(ErrorInfo::new("funnel.io", "missing"));
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["family"], "Io");
        assert_eq!(json["detail"]["code"], "funnel.io");
        let back: FunnelError = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, err);
    }
}
