//! Host navigation boundary.
//!
//! The engine only ever issues "navigate tab `T` (or the active tab) to URL
//! `U`" and does not wait for an acknowledgement.

use airoute_protocol::NavigationCommand;
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("failed to open browser: {0}")]
    BrowserLaunch(#[source] std::io::Error),

    #[error("navigation host is gone")]
    HostClosed,

    #[error("failed to encode navigation command: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, command: &NavigationCommand) -> Result<(), NavigationError>;
}

/// Opens targets in the system browser.
///
/// The desktop browser offers no tab addressing, so the tab reference is
/// logged and otherwise ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, command: &NavigationCommand) -> Result<(), NavigationError> {
        tracing::debug!(tab = %command.tab, url = %command.url, "opening browser");
        webbrowser::open(&command.url).map_err(NavigationError::BrowserLaunch)
    }
}

/// Forwards commands to whoever holds the receiving half.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<NavigationCommand>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NavigationCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, command: &NavigationCommand) -> Result<(), NavigationError> {
        self.tx
            .send(command.clone())
            .map_err(|_| NavigationError::HostClosed)
    }
}
