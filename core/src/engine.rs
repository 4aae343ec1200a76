//! Resolution engine.
//!
//! One request walks `Normalizing → Querying → {Resolved, Fallback} →
//! Navigating` exactly once. Every failure on the way (transport, status,
//! payload) lands on the same profile fallback URL; the reason is kept on
//! the [`Resolution`] for logs and diagnostics only.

use std::sync::Arc;

use airoute_protocol::DirectoryRecord;
use airoute_protocol::NavigationCommand;
use airoute_protocol::TabId;
use airoute_protocol::TriggerEnvelope;
use serde::Serialize;

use crate::config::ResolverConfig;
use crate::directory::DirectoryClient;
use crate::directory::LookupError;
use crate::identity::Identity;
use crate::navigator::Navigator;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to build directory client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Identity to resolve plus the tab it came from. Consumed by
/// [`ResolutionEngine::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Raw identity; normalized by the engine.
    pub identity: String,
    pub origin_tab: Option<TabId>,
}

impl ResolutionRequest {
    pub fn new(identity: impl Into<String>, origin_tab: Option<TabId>) -> Self {
        Self {
            identity: identity.into(),
            origin_tab,
        }
    }
}

impl From<TriggerEnvelope> for ResolutionRequest {
    fn from(envelope: TriggerEnvelope) -> Self {
        Self::new(envelope.message.identity(), envelope.origin_tab)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    Transport { message: String, timed_out: bool },
    Status { status: u16 },
    MalformedBody { message: String },
    MissingInterface,
    LegacyEndpointNotUrl { endpoint: Option<String> },
    UnrecognizedMode { mode: Option<String> },
}

impl From<&LookupError> for FallbackReason {
    fn from(err: &LookupError) -> Self {
        match err {
            LookupError::Transport(e) => Self::Transport {
                message: e.to_string(),
                timed_out: e.is_timeout(),
            },
            LookupError::Status { status } => Self::Status { status: *status },
            LookupError::Decode(e) => Self::MalformedBody {
                message: e.to_string(),
            },
        }
    }
}

/// Which rule produced the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "detail", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Interface,
    LegacyEndpoint,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub identity: Identity,
    pub target: String,
    pub outcome: ResolutionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<DirectoryRecord>,
}

/// Pick the endpoint a directory record points at, if it names one.
///
/// A present interface is used verbatim; only a legacy endpoint has to look
/// like a URL.
pub fn select_endpoint(record: &DirectoryRecord) -> Result<(String, ResolutionOutcome), FallbackReason> {
    match record {
        DirectoryRecord::SovereignApp {
            interface: Some(interface),
        } if !interface.is_empty() => Ok((interface.clone(), ResolutionOutcome::Interface)),
        DirectoryRecord::SovereignApp { .. } => Err(FallbackReason::MissingInterface),
        DirectoryRecord::LegacyMcp {
            endpoint: Some(endpoint),
        } if endpoint.starts_with("http") => {
            Ok((endpoint.clone(), ResolutionOutcome::LegacyEndpoint))
        }
        DirectoryRecord::LegacyMcp { endpoint } => Err(FallbackReason::LegacyEndpointNotUrl {
            endpoint: endpoint.clone(),
        }),
        DirectoryRecord::Unrecognized { mode } => {
            Err(FallbackReason::UnrecognizedMode { mode: mode.clone() })
        }
    }
}

pub struct ResolutionEngine {
    config: Arc<ResolverConfig>,
    directory: DirectoryClient,
}

impl ResolutionEngine {
    pub fn new(config: Arc<ResolverConfig>) -> Result<Self, ResolveError> {
        let directory = DirectoryClient::new(&config)?;
        Ok(Self { config, directory })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Query the directory once and compute the navigation target.
    pub async fn resolve(&self, identity: Identity) -> Resolution {
        let (record, selected) = match self.directory.lookup(&identity).await {
            Ok(record) => {
                let selected = select_endpoint(&record);
                (Some(record), selected)
            }
            Err(err) => {
                match &err {
                    LookupError::Status { status } => {
                        tracing::info!(%identity, status, "directory has no usable answer");
                    }
                    LookupError::Transport(_) => {
                        tracing::warn!(%identity, error = %err, "directory unreachable");
                    }
                    LookupError::Decode(_) => {
                        tracing::warn!(%identity, error = %err, "malformed directory response");
                    }
                }
                (None, Err(FallbackReason::from(&err)))
            }
        };

        let (target, outcome) = match selected {
            Ok(chosen) => chosen,
            Err(reason) => {
                if record.is_some() {
                    tracing::warn!(%identity, ?reason, "directory record has no usable endpoint");
                }
                (
                    self.config.fallback_url(&identity),
                    ResolutionOutcome::Fallback(reason),
                )
            }
        };

        tracing::debug!(%identity, %target, ?outcome, "resolved");
        Resolution {
            identity,
            target,
            outcome,
            record,
        }
    }

    /// Normalize and resolve. `None` when the input holds no identity.
    pub async fn resolve_raw(&self, raw: &str) -> Option<Resolution> {
        let identity = self.config.parse_identity(raw)?;
        Some(self.resolve(identity).await)
    }

    /// Full request lifecycle: normalize, resolve, navigate.
    ///
    /// Returns the command handed to the navigator, or `None` when the
    /// request carried no identity (nothing is looked up or navigated).
    /// Navigator failures are logged, never returned.
    pub async fn handle(
        &self,
        request: ResolutionRequest,
        navigator: &dyn Navigator,
    ) -> Option<NavigationCommand> {
        let Some(resolution) = self.resolve_raw(&request.identity).await else {
            tracing::debug!("empty identity, nothing to resolve");
            return None;
        };

        let command = NavigationCommand {
            tab: request.origin_tab.into(),
            url: resolution.target,
        };
        if let Err(err) = navigator.navigate(&command) {
            tracing::error!(url = %command.url, tab = %command.tab, "navigation failed: {err}");
        }
        Some(command)
    }
}
