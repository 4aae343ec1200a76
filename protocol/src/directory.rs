//! Directory lookup response.
//!
//! The directory answers with a JSON object whose `mode` selects where the
//! endpoint lives:
//!
//! ```json
//! {"mode": "sovereign_app", "record": {"endpoint": {"interface": "https://..."}}}
//! {"mode": "legacy_mcp", "endpoint": "https://..."}
//! ```
//!
//! Anything else is kept as [`DirectoryRecord::Unrecognized`] rather than
//! rejected; deciding what to do with it is the engine's job.

use serde::Serialize;
use serde_json::Value;

pub const MODE_SOVEREIGN_APP: &str = "sovereign_app";
pub const MODE_LEGACY_MCP: &str = "legacy_mcp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DirectoryRecord {
    SovereignApp {
        interface: Option<String>,
    },
    LegacyMcp {
        endpoint: Option<String>,
    },
    Unrecognized {
        #[serde(rename = "raw_mode")]
        mode: Option<String>,
    },
}

impl DirectoryRecord {
    /// Interpret a decoded response body. Never fails: missing or mistyped
    /// fields surface as `None`, unknown modes as `Unrecognized`.
    pub fn from_value(value: &Value) -> Self {
        match value.get("mode").and_then(Value::as_str) {
            Some(MODE_SOVEREIGN_APP) => Self::SovereignApp {
                interface: value
                    .pointer("/record/endpoint/interface")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            Some(MODE_LEGACY_MCP) => Self::LegacyMcp {
                endpoint: value
                    .get("endpoint")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            other => Self::Unrecognized {
                mode: other.map(str::to_string),
            },
        }
    }

    /// Mode string as reported by the directory, if any.
    pub fn mode(&self) -> Option<&str> {
        match self {
            Self::SovereignApp { .. } => Some(MODE_SOVEREIGN_APP),
            Self::LegacyMcp { .. } => Some(MODE_LEGACY_MCP),
            Self::Unrecognized { mode } => mode.as_deref(),
        }
    }
}
