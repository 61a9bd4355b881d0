use std::collections::BTreeMap;
use std::iter::FromIterator;

use funnel_core::errors::{ErrorInfo, FunnelError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

fn serde_error(code: &str, err: impl ToString) -> FunnelError {
    FunnelError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn decode_error(code: &str, err: impl ToString) -> FunnelError {
    FunnelError::Decode(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with sorted object keys.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, FunnelError> {
    let value =
        serde_json::to_value(value).map_err(|err| serde_error("funnel.json.serialize", err))?;
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonicalize(value))
        .map_err(|err| serde_error("funnel.json.write", err))?;
    Ok(bytes)
}

/// Serializes a value into indented JSON with sorted object keys.
pub fn to_pretty_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, FunnelError> {
    let value =
        serde_json::to_value(value).map_err(|err| serde_error("funnel.json.serialize", err))?;
    serde_json::to_vec_pretty(&canonicalize(value))
        .map_err(|err| serde_error("funnel.json.write", err))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, FunnelError> {
    serde_json::from_slice(data).map_err(|err| decode_error("funnel.json.deserialize", err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, FunnelError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("funnel.yaml.serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, FunnelError> {
    serde_yaml::from_slice(data).map_err(|err| decode_error("funnel.yaml.deserialize", err))
}
