//! Root of the `airoute-core` library.
//!
//! Turns `ai://` / `mcp://` identities into exactly one navigation target:
//! the interface endpoint the directory reports, or the profile page when
//! the directory cannot give a usable answer.

// Prevent accidental direct writes to stdout/stderr in library code. All
// user-visible output goes through the CLI or the tracing stack.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod bridge;
pub mod config;
pub mod directory;
pub mod engine;
pub mod identity;
pub mod navigator;
pub mod triggers;
pub mod zone;

pub use bridge::BridgeClient;
pub use bridge::BridgeError;
pub use bridge::BridgeServer;
pub use config::ConfigError;
pub use config::ConfigOverrides;
pub use config::ResolverConfig;
pub use directory::DirectoryClient;
pub use directory::LookupError;
pub use engine::FallbackReason;
pub use engine::Resolution;
pub use engine::ResolutionEngine;
pub use engine::ResolutionOutcome;
pub use engine::ResolutionRequest;
pub use engine::ResolveError;
pub use identity::Identity;
pub use navigator::BrowserNavigator;
pub use navigator::ChannelNavigator;
pub use navigator::NavigationError;
pub use navigator::Navigator;
