//! Identity normalization.
//!
//! A raw identity may arrive as `ai://Acme@WebAI `, `MCP://acme@webai` or
//! plain `acme@webai`. All of them normalize to `acme@webai`.

use serde::Serialize;
use std::fmt;

/// A normalized, non-empty identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    normalized: String,
    /// Scheme prefix the raw input carried, lower-cased (`"ai://"`).
    /// Informational only; resolution does not depend on it.
    #[serde(skip_serializing_if = "Option::is_none")]
    scheme: Option<String>,
}

impl Identity {
    /// Normalize `raw` against the recognized scheme prefixes.
    ///
    /// Returns `None` for input that is empty once the prefix and
    /// surrounding whitespace are gone.
    pub fn parse(raw: &str, schemes: &[String]) -> Option<Self> {
        let mut rest = raw.trim();
        let mut scheme = None;
        // Repeat so that `ai://ai://x` and `x` normalize identically on a
        // second pass.
        while let Some((prefix, stripped)) = strip_scheme(rest, schemes) {
            scheme.get_or_insert_with(|| prefix.to_ascii_lowercase());
            rest = stripped.trim();
        }

        let normalized = rest.to_lowercase();
        if normalized.is_empty() {
            return None;
        }

        Some(Self { normalized, scheme })
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Normalized string form, or an empty string when there is no identity.
pub fn normalize(raw: &str, schemes: &[String]) -> String {
    Identity::parse(raw, schemes)
        .map(|identity| identity.normalized)
        .unwrap_or_default()
}

/// Strip one case-insensitive scheme prefix from the start of `input`.
///
/// Returns the prefix as configured together with the remainder.
pub fn strip_scheme<'a, 's>(input: &'a str, schemes: &'s [String]) -> Option<(&'s str, &'a str)> {
    schemes.iter().find_map(|scheme| {
        let head = input.get(..scheme.len())?;
        if head.eq_ignore_ascii_case(scheme) {
            Some((scheme.as_str(), &input[scheme.len()..]))
        } else {
            None
        }
    })
}
