//! `airoute` command line.
//!
//! ## Commands
//!
//! - `airoute resolve <identity>` - resolve and print (or `--open`) the target
//! - `airoute lookup <identity>` - dig-style directory diagnostics
//! - `airoute intercept <search-url>` - run the search interception detector
//! - `airoute bridge` - newline-delimited trigger host on stdin/stdout
//! - `airoute zone validate` - check zone files before publishing
//!
//! ## Exit Codes
//!
//! - 0: Success
//! - 1: Usage or configuration error, or nothing to resolve
//! - 2: One or more zone files are invalid

use std::path::PathBuf;
use std::sync::Arc;

use airoute_core::ConfigOverrides;
use airoute_core::ResolutionEngine;
use airoute_core::ResolverConfig;
use anyhow::Context;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::EnvFilter;

pub mod bridge_cmd;
pub mod lookup_cmd;
pub mod resolve_cmd;
pub mod zone_cmd;

use bridge_cmd::BridgeArgs;
use lookup_cmd::LookupArgs;
use resolve_cmd::InterceptArgs;
use resolve_cmd::ResolveArgs;
use zone_cmd::ZoneCli;

pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const INVALID: i32 = 2;
}

/// Route ai:// and mcp:// identities to their endpoints
#[derive(Debug, Parser)]
#[command(name = "airoute", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Config file (default: $AIROUTE_CONFIG, then ~/.config/airoute/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory host root, e.g. http://localhost:8000 (overrides $AIROUTE_ROOT)
    #[arg(long, short = 's', global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Log at debug level (RUST_LOG is ignored)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn load_config(&self) -> anyhow::Result<ResolverConfig> {
        let overrides = ConfigOverrides {
            config_path: self.config.clone(),
            root: self.server.clone(),
        }
        .or(ConfigOverrides::from_env());
        ResolverConfig::load(&overrides).context("failed to load resolver config")
    }

    pub fn engine(&self) -> anyhow::Result<Arc<ResolutionEngine>> {
        let config = Arc::new(self.load_config()?);
        let engine = ResolutionEngine::new(config).context("failed to start resolver")?;
        Ok(Arc::new(engine))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve an identity and print the URL it navigates to
    Resolve(ResolveArgs),

    /// Query the directory and explain the answer
    ///
    /// Prints the server, the directory status, the record mode and the
    /// chosen target. Use `--json` for the full resolution.
    Lookup(LookupArgs),

    /// Check a search-results URL for an identity query and resolve it
    Intercept(InterceptArgs),

    /// Accept trigger envelopes on stdin, one JSON object per line
    ///
    /// Each line is acknowledged on stdout immediately; navigations are
    /// printed as they complete (or opened with `--open`).
    Bridge(BridgeArgs),

    /// Zone file tooling
    Zone(ZoneCli),
}

impl Cli {
    pub async fn run(self) -> i32 {
        let global = self.global;
        match self.command {
            Command::Resolve(args) => resolve_cmd::run_resolve(&global, args).await,
            Command::Lookup(args) => lookup_cmd::run_lookup(&global, args).await,
            Command::Intercept(args) => resolve_cmd::run_intercept(&global, args).await,
            Command::Bridge(args) => bridge_cmd::run_bridge(&global, args).await,
            Command::Zone(zone) => zone.run(),
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
pub fn init_logging(verbose: bool) {
    let default_level = "warn";
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(crate) fn report(err: &anyhow::Error) -> i32 {
    eprintln!("error: {err:#}");
    exit_codes::FAILURE
}
