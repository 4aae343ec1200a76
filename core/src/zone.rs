//! Zone file validation.
//!
//! A zone is the directory's source record for one identity:
//!
//! ```json
//! {
//!   "identity": "acme",
//!   "created_at": "2025-01-01T00:00:00Z",
//!   "info": "optional free text",
//!   "records": [
//!     {"type": "APP", "value": "https://acme.dev"},
//!     {"type": "MCP", "value": {"endpoint": "https://acme.dev/mcp"}, "priority": 10}
//!   ]
//! }
//! ```
//!
//! Validation stops at the first defect.

use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde_json::Value;

pub const REQUIRED_FIELDS: [&str; 3] = ["identity", "created_at", "records"];
pub const RECORD_TYPES: [&str; 7] = ["BIND", "APP", "MCP", "KEY", "TXT", "CAPS", "CASCADE"];

#[allow(clippy::expect_used)]
static IDENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9\-_]+$").expect("valid identity regex"));

#[allow(clippy::expect_used)]
static CREATED_AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}Z")
        .expect("valid timestamp regex")
});

#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON ({0})")]
    Json(#[from] serde_json::Error),

    #[error("zone must be a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("'identity' must be lowercase, ascii, no spaces, no authority, no @ (got '{0}')")]
    InvalidIdentity(String),

    #[error("'identity' does not match filename ('{identity}' vs '{stem}')")]
    IdentityMismatch { identity: String, stem: String },

    #[error("'created_at' must be ISO-8601 UTC string")]
    InvalidCreatedAt,

    #[error("'info' must be a string if present")]
    InvalidInfo,

    #[error("'records' must be a non-empty array")]
    EmptyRecords,

    #[error("records[{index}]: missing required 'type' or 'value'")]
    RecordIncomplete { index: usize },

    #[error("records[{index}]: invalid type '{record_type}'")]
    InvalidRecordType { index: usize, record_type: String },

    #[error("records[{index}]: MCP priority must be integer")]
    InvalidPriority { index: usize },

    #[error("records[{index}]: MCP value must be object with 'endpoint' HTTPS URL")]
    InvalidMcpValue { index: usize },

    #[error("records[{index}]: CAPS value must be list of strings")]
    InvalidCapsValue { index: usize },

    #[error("records[{index}]: {record_type} value must be string")]
    InvalidStringValue { index: usize, record_type: String },
}

/// Validate the zone stored at `path`; the file stem must equal the identity.
pub fn validate_zone_file(path: &Path) -> Result<(), ZoneError> {
    let content = std::fs::read_to_string(path).map_err(|source| ZoneError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let zone: Value = serde_json::from_str(&content)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    validate_zone(&zone, &stem)
}

pub fn validate_zone(zone: &Value, stem: &str) -> Result<(), ZoneError> {
    let object = zone.as_object().ok_or(ZoneError::NotAnObject)?;
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
        return Err(ZoneError::MissingField(*missing));
    }

    let identity = match &zone["identity"] {
        Value::String(identity) if IDENTITY_RE.is_match(identity) => identity,
        other => return Err(ZoneError::InvalidIdentity(display_value(other))),
    };
    if identity != stem {
        return Err(ZoneError::IdentityMismatch {
            identity: identity.clone(),
            stem: stem.to_string(),
        });
    }

    if !zone["created_at"]
        .as_str()
        .is_some_and(|ts| CREATED_AT_RE.is_match(ts))
    {
        return Err(ZoneError::InvalidCreatedAt);
    }

    if object.get("info").is_some_and(|info| !info.is_string()) {
        return Err(ZoneError::InvalidInfo);
    }

    let records = match zone["records"].as_array() {
        Some(records) if !records.is_empty() => records,
        _ => return Err(ZoneError::EmptyRecords),
    };

    for (index, record) in records.iter().enumerate() {
        validate_record(index, record)?;
    }
    Ok(())
}

fn validate_record(index: usize, record: &Value) -> Result<(), ZoneError> {
    let (Some(record_type), Some(value)) = (record.get("type"), record.get("value")) else {
        return Err(ZoneError::RecordIncomplete { index });
    };

    let record_type = match record_type.as_str() {
        Some(t) if RECORD_TYPES.contains(&t) => t,
        _ => {
            return Err(ZoneError::InvalidRecordType {
                index,
                record_type: display_value(record_type),
            });
        }
    };

    match record_type {
        "MCP" => {
            if record.get("priority").is_some_and(|p| !(p.is_i64() || p.is_u64())) {
                return Err(ZoneError::InvalidPriority { index });
            }
            let endpoint_ok = value
                .get("endpoint")
                .and_then(Value::as_str)
                .is_some_and(|e| e.starts_with("https://"));
            if !value.is_object() || !endpoint_ok {
                return Err(ZoneError::InvalidMcpValue { index });
            }
        }
        "CAPS" => {
            let all_strings = value
                .as_array()
                .is_some_and(|caps| caps.iter().all(Value::is_string));
            if !all_strings {
                return Err(ZoneError::InvalidCapsValue { index });
            }
        }
        _ => {
            if !value.is_string() {
                return Err(ZoneError::InvalidStringValue {
                    index,
                    record_type: record_type.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `*.json` files directly inside `dir`, sorted by name.
pub fn zone_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
