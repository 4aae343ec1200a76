//! `airoute resolve` and `airoute intercept`.

use std::io::Write;
use std::sync::Arc;

use airoute_core::BrowserNavigator;
use airoute_core::NavigationError;
use airoute_core::Navigator;
use airoute_core::ResolutionEngine;
use airoute_core::ResolutionRequest;
use airoute_core::triggers::detect_search_query;
use airoute_protocol::NavigationCommand;
use airoute_protocol::TabId;
use clap::Parser;

use crate::GlobalArgs;
use crate::exit_codes;
use crate::report;

#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Identity, with or without an ai:// or mcp:// prefix
    pub identity: String,

    /// Open the target in the system browser instead of printing it
    #[arg(long)]
    pub open: bool,

    /// Host tab the request came from
    #[arg(long, value_name = "ID")]
    pub tab: Option<u64>,
}

#[derive(Debug, Parser)]
pub struct InterceptArgs {
    /// Search-results URL, e.g. https://www.google.com/search?q=ai%3A%2F%2Facme
    pub url: String,

    /// Open the target in the system browser instead of printing it
    #[arg(long)]
    pub open: bool,

    /// Host tab the search was made in
    #[arg(long, value_name = "ID")]
    pub tab: Option<u64>,
}

/// Prints navigations on stdout, one per line.
#[derive(Debug, Clone, Copy)]
pub struct StdoutNavigator {
    json: bool,
}

impl StdoutNavigator {
    /// Only the target URL.
    pub fn plain() -> Self {
        Self { json: false }
    }

    /// The whole command as a JSON object.
    pub fn json() -> Self {
        Self { json: true }
    }
}

impl Navigator for StdoutNavigator {
    fn navigate(&self, command: &NavigationCommand) -> Result<(), NavigationError> {
        let line = if self.json {
            serde_json::to_string(command)?
        } else {
            command.url.clone()
        };
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")
            .and_then(|()| stdout.flush())
            .map_err(|err| {
                tracing::debug!("stdout closed: {err}");
                NavigationError::HostClosed
            })
    }
}

pub(crate) fn navigator(open: bool, json: bool) -> Arc<dyn Navigator> {
    match (open, json) {
        (true, _) => Arc::new(BrowserNavigator),
        (false, true) => Arc::new(StdoutNavigator::json()),
        (false, false) => Arc::new(StdoutNavigator::plain()),
    }
}

pub async fn run_resolve(global: &GlobalArgs, args: ResolveArgs) -> i32 {
    let engine = match global.engine() {
        Ok(engine) => engine,
        Err(err) => return report(&err),
    };
    let request = ResolutionRequest::new(args.identity, args.tab.map(TabId));
    dispatch(&engine, request, args.open).await
}

pub async fn run_intercept(global: &GlobalArgs, args: InterceptArgs) -> i32 {
    let engine = match global.engine() {
        Ok(engine) => engine,
        Err(err) => return report(&err),
    };
    let Some(interception) = detect_search_query(&args.url, engine.config()) else {
        eprintln!("not an identity search, left alone");
        return exit_codes::FAILURE;
    };
    let envelope = interception.into_envelope(args.tab.map(TabId));
    dispatch(&engine, ResolutionRequest::from(envelope), args.open).await
}

async fn dispatch(engine: &ResolutionEngine, request: ResolutionRequest, open: bool) -> i32 {
    let navigator = navigator(open, false);
    match engine.handle(request, navigator.as_ref()).await {
        Some(_) => exit_codes::SUCCESS,
        None => {
            eprintln!("no identity to resolve");
            exit_codes::FAILURE
        }
    }
}
