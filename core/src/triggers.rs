//! Trigger adapters: search interception, manual input, address bar.
//!
//! Each adapter only turns its input into a [`TriggerEnvelope`]; none of
//! them resolve anything themselves.

use airoute_protocol::TabId;
use airoute_protocol::TriggerEnvelope;
use airoute_protocol::TriggerMessage;

use crate::config::ResolverConfig;
use crate::config::matches_placeholder;
use crate::identity::strip_scheme;

/// Search query parameter inspected by the interception detector.
pub const SEARCH_QUERY_PARAM: &str = "q";

/// A search navigation that carried an identity query.
///
/// The host must stop rendering the search page once this is returned.
/// Stopping is irreversible: if forwarding fails afterwards the page stays
/// stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interception {
    /// Query with the scheme prefix removed; not otherwise normalized.
    pub identity: String,
}

impl Interception {
    pub fn into_envelope(self, origin_tab: Option<TabId>) -> TriggerEnvelope {
        TriggerEnvelope::new(TriggerMessage::resolve_identity(self.identity), origin_tab)
    }
}

/// Inspect a search-results URL for an identity query such as
/// `https://www.google.com/search?q=ai%3A%2F%2Facme`.
pub fn detect_search_query(search_url: &str, config: &ResolverConfig) -> Option<Interception> {
    let url = url::Url::parse(search_url).ok()?;
    let query = url
        .query_pairs()
        .find(|(key, _)| key == SEARCH_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())?;

    let (_, identity) = strip_scheme(query.trim(), &config.schemes)?;
    tracing::debug!(identity, "intercepted identity search");
    Some(Interception {
        identity: identity.to_string(),
    })
}

/// State of the manual identity field.
#[derive(Debug, Clone)]
pub struct ManualInput {
    value: String,
    placeholders: Vec<String>,
}

impl ManualInput {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            value: String::new(),
            placeholders: config.placeholders.clone(),
        }
    }

    pub fn with_value(config: &ResolverConfig, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(config)
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Clear the field if it still shows placeholder text.
    pub fn focus(&mut self) {
        if matches_placeholder(&self.placeholders, &self.value) {
            self.value.clear();
        }
    }

    /// The "trace" action. `None` when the field is blank.
    ///
    /// The popup has no sender tab, so the request targets the active tab.
    pub fn submit(&self) -> Option<TriggerEnvelope> {
        let identity = self.value.trim().to_lowercase();
        if identity.is_empty() {
            return None;
        }
        Some(TriggerEnvelope::new(
            TriggerMessage::resolve_identity(identity),
            None,
        ))
    }
}

/// Text typed after the address-bar keyword.
pub fn omnibox_request(text: &str) -> Option<TriggerEnvelope> {
    let identity = text.trim().to_lowercase();
    if identity.is_empty() {
        return None;
    }
    Some(TriggerEnvelope::new(
        TriggerMessage::resolve_identity(identity),
        None,
    ))
}
