//! Trigger envelope and acknowledgement.
//!
//! Every trigger (search interception, manual form, address bar) speaks the
//! same shape: `{"action": "resolve_identity", "identity": "..."}`. Sender
//! context that the browser host would attach implicitly travels as an
//! explicit `origin_tab` field.

use serde::Deserialize;
use serde::Serialize;

use crate::navigation::TabId;

/// Action name carried in the `action` field of a resolve request.
pub const ACTION_RESOLVE_IDENTITY: &str = "resolve_identity";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TriggerMessage {
    ResolveIdentity { identity: String },
}

impl TriggerMessage {
    pub fn resolve_identity(identity: impl Into<String>) -> Self {
        Self::ResolveIdentity {
            identity: identity.into(),
        }
    }

    /// Raw identity as supplied by the trigger, before normalization.
    pub fn identity(&self) -> &str {
        match self {
            Self::ResolveIdentity { identity } => identity,
        }
    }
}

/// A trigger message together with the tab it originated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEnvelope {
    #[serde(flatten)]
    pub message: TriggerMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_tab: Option<TabId>,
}

impl TriggerEnvelope {
    pub fn new(message: TriggerMessage, origin_tab: Option<TabId>) -> Self {
        Self {
            message,
            origin_tab,
        }
    }
}

/// Immediate reply to a trigger. The resolution itself runs after the ack
/// is sent, so `Resolving` says nothing about the eventual outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Ack {
    Resolving,
    Rejected { reason: String },
}
