//! Resolver configuration.
//!
//! Built once at startup and shared read-only. Sources, in order:
//! 1. Explicit config path (`--config` or `AIROUTE_CONFIG`)
//! 2. `~/.config/airoute/config.toml`
//! 3. Compiled-in defaults
//!
//! A host root override (`--server` or `AIROUTE_ROOT`) is applied last and
//! re-derives both the lookup root and the profile base from it.

use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::identity::Identity;

pub const DEFAULT_ROOT: &str = "https://witchbornsystems.ai";
pub const LOOKUP_PATH: &str = "/codex/resolve";
pub const PROFILE_PATH: &str = "/codex/profile";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

pub const CONFIG_ENV_VAR: &str = "AIROUTE_CONFIG";
pub const ROOT_ENV_VAR: &str = "AIROUTE_ROOT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{field} must be an absolute http(s) URL, got {value:?}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("at least one identity scheme prefix is required")]
    NoSchemes,

    #[error("scheme prefix {0:?} must end with \"://\"")]
    InvalidScheme(String),
}

/// Immutable resolver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Directory API root; identities are appended as one path segment.
    #[serde(default = "default_lookup_root")]
    pub lookup_root: String,

    /// Profile page; the identity is passed as the `query` parameter.
    #[serde(default = "default_profile_base")]
    pub profile_base: String,

    /// Recognized scheme prefixes, matched case-insensitively.
    #[serde(default = "default_schemes")]
    pub schemes: Vec<String>,

    /// Manual-input values treated as empty on focus.
    #[serde(default = "default_placeholders")]
    pub placeholders: Vec<String>,

    /// Upper bound on a single directory lookup.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_lookup_root() -> String {
    format!("{DEFAULT_ROOT}{LOOKUP_PATH}")
}

fn default_profile_base() -> String {
    format!("{DEFAULT_ROOT}{PROFILE_PATH}")
}

fn default_schemes() -> Vec<String> {
    vec!["ai://".to_string(), "mcp://".to_string()]
}

fn default_placeholders() -> Vec<String> {
    vec![
        String::new(),
        "name@authority".to_string(),
        "witchborn@webai".to_string(),
    ]
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            lookup_root: default_lookup_root(),
            profile_base: default_profile_base(),
            schemes: default_schemes(),
            placeholders: default_placeholders(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub root: Option<String>,
}

impl ConfigOverrides {
    /// Read `AIROUTE_CONFIG` and `AIROUTE_ROOT`.
    pub fn from_env() -> Self {
        Self {
            config_path: std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            root: std::env::var(ROOT_ENV_VAR).ok().filter(|v| !v.trim().is_empty()),
        }
    }

    /// Fill unset fields from `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            config_path: self.config_path.or(fallback.config_path),
            root: self.root.or(fallback.root),
        }
    }
}

impl ResolverConfig {
    /// Defaults with every URL derived from `root` (e.g. `http://localhost:8000`).
    pub fn with_root(root: &str) -> Self {
        Self::default().rooted_at(root)
    }

    fn rooted_at(mut self, root: &str) -> Self {
        let root = root.trim().trim_end_matches('/');
        self.lookup_root = format!("{root}{LOOKUP_PATH}");
        self.profile_base = format!("{root}{PROFILE_PATH}");
        self
    }

    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let config = match overrides.config_path.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    tracing::debug!("no config file found, using defaults");
                    Self::default()
                }
            },
        };

        let config = match overrides.root.as_deref() {
            Some(root) => {
                tracing::debug!(root, "overriding directory host root");
                config.rooted_at(root)
            }
            None => config,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded resolver config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url("lookup_root", &self.lookup_root)?;
        check_http_url("profile_base", &self.profile_base)?;

        if self.schemes.is_empty() {
            return Err(ConfigError::NoSchemes);
        }
        if let Some(bad) = self.schemes.iter().find(|s| !s.ends_with("://") || s.len() <= 3) {
            return Err(ConfigError::InvalidScheme(bad.clone()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Profile page used whenever the directory gives no usable endpoint.
    ///
    /// `query` is appended to any query the profile base already carries.
    pub fn fallback_url(&self, identity: &Identity) -> String {
        match url::Url::parse(&self.profile_base) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("query", identity.as_str());
                url.into()
            }
            Err(_) => format!(
                "{}?query={}",
                self.profile_base,
                urlencoding::encode(identity.as_str())
            ),
        }
    }

    pub fn parse_identity(&self, raw: &str) -> Option<Identity> {
        Identity::parse(raw, &self.schemes)
    }

    pub fn is_placeholder(&self, value: &str) -> bool {
        matches_placeholder(&self.placeholders, value)
    }
}

pub(crate) fn matches_placeholder(placeholders: &[String], value: &str) -> bool {
    let value = value.to_lowercase();
    placeholders.iter().any(|p| p.to_lowercase() == value)
}

/// `~/.config/airoute/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("airoute").join("config.toml"))
}

fn check_http_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}
