//! HTTP client for the identity directory.

use airoute_protocol::DirectoryRecord;
use reqwest::Client;

use crate::config::ResolverConfig;
use crate::identity::Identity;

/// Why a lookup produced no record. Every variant leads to the profile
/// fallback; they are kept apart for logs and diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("directory returned HTTP {status}")]
    Status { status: u16 },

    #[error("directory response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LookupError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// Directory client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    lookup_root: String,
}

impl DirectoryClient {
    /// Build a client whose requests are bounded by the configured timeout.
    pub fn new(config: &ResolverConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("airoute/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            lookup_root: config.lookup_root.clone(),
        })
    }

    pub fn lookup_url(&self, identity: &Identity) -> String {
        format!(
            "{}/{}",
            self.lookup_root.trim_end_matches('/'),
            urlencoding::encode(identity.as_str())
        )
    }

    /// Single `GET <lookup_root>/<identity>`. No retry.
    pub async fn lookup(&self, identity: &Identity) -> Result<DirectoryRecord, LookupError> {
        let url = self.lookup_url(identity);
        tracing::debug!(%identity, %url, "querying directory");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        Ok(DirectoryRecord::from_value(&value))
    }
}
