use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Opaque host tab reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which tab a navigation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TabTarget {
    /// The tab the trigger came from.
    Tab(TabId),
    /// The active tab of the current window.
    Active,
}

impl From<Option<TabId>> for TabTarget {
    fn from(tab: Option<TabId>) -> Self {
        tab.map_or(Self::Active, Self::Tab)
    }
}

impl fmt::Display for TabTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tab(id) => write!(f, "tab {id}"),
            Self::Active => f.write_str("active tab"),
        }
    }
}

/// "Navigate tab `T` (or the active tab) to URL `U`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationCommand {
    pub tab: TabTarget,
    pub url: String,
}
