//! `airoute lookup`: directory diagnostics in the style of `dig`.
//!
//! ```text
//! ;; <<>> airoute 0.0.0 <<>> ai://acme
//! ;; server: https://witchbornsystems.ai/codex/resolve
//! ;; STATUS: NOERROR
//! ;; MODE:   sovereign_app
//! ;; TARGET: https://acme.dev/chat
//! ;; RULE:   interface
//! ```

use airoute_core::FallbackReason;
use airoute_core::Resolution;
use airoute_core::ResolutionOutcome;
use airoute_protocol::DirectoryRecord;
use clap::Parser;

use crate::GlobalArgs;
use crate::exit_codes;
use crate::report;

#[derive(Debug, Parser)]
pub struct LookupArgs {
    /// Identity, with or without an ai:// or mcp:// prefix
    pub identity: String,

    /// Output the resolution as JSON for automation
    #[arg(long, short = 'j')]
    pub json: bool,
}

pub async fn run_lookup(global: &GlobalArgs, args: LookupArgs) -> i32 {
    let engine = match global.engine() {
        Ok(engine) => engine,
        Err(err) => return report(&err),
    };

    let Some(resolution) = engine.resolve_raw(&args.identity).await else {
        eprintln!("no identity to look up");
        return exit_codes::FAILURE;
    };

    if args.json {
        return match serde_json::to_string_pretty(&resolution) {
            Ok(json) => {
                println!("{json}");
                exit_codes::SUCCESS
            }
            Err(err) => report(&err.into()),
        };
    }

    println!(
        ";; <<>> airoute {} <<>> {}",
        env!("CARGO_PKG_VERSION"),
        args.identity.trim()
    );
    println!(";; server: {}", engine.config().lookup_root);
    print!("{}", render(&resolution));
    exit_codes::SUCCESS
}

/// Everything below the header, one `;;` line each.
pub fn render(resolution: &Resolution) -> String {
    let mut out = format!(";; STATUS: {}\n", status_label(&resolution.outcome));
    if let Some(record) = &resolution.record {
        out.push_str(&format!(";; MODE:   {}\n", mode_label(record)));
    }
    out.push_str(&format!(";; TARGET: {}\n", resolution.target));
    out.push_str(&format!(";; RULE:   {}\n", rule_label(&resolution.outcome)));
    out
}

/// DNS-flavoured summary of how the directory answered.
pub fn status_label(outcome: &ResolutionOutcome) -> &'static str {
    match outcome {
        ResolutionOutcome::Fallback(FallbackReason::Status { status: 404 }) => "NXDOMAIN",
        ResolutionOutcome::Fallback(FallbackReason::Status { .. }) => "SERVFAIL",
        ResolutionOutcome::Fallback(FallbackReason::Transport {
            timed_out: true, ..
        }) => "TIMEOUT",
        ResolutionOutcome::Fallback(FallbackReason::Transport { .. }) => "CONNECTION_ERROR",
        ResolutionOutcome::Fallback(FallbackReason::MalformedBody { .. }) => "FORMERR",
        _ => "NOERROR",
    }
}

fn mode_label(record: &DirectoryRecord) -> String {
    match record {
        DirectoryRecord::Unrecognized { mode: Some(mode) } => format!("unrecognized ({mode})"),
        DirectoryRecord::Unrecognized { mode: None } => "unrecognized (none)".to_string(),
        other => other.mode().unwrap_or_default().to_string(),
    }
}

fn rule_label(outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::Interface => "interface".to_string(),
        ResolutionOutcome::LegacyEndpoint => "legacy endpoint".to_string(),
        ResolutionOutcome::Fallback(reason) => format!("fallback ({})", reason_label(reason)),
    }
}

fn reason_label(reason: &FallbackReason) -> String {
    match reason {
        FallbackReason::Transport { message, .. } => message.clone(),
        FallbackReason::Status { status } => format!("HTTP {status}"),
        FallbackReason::MalformedBody { message } => message.clone(),
        FallbackReason::MissingInterface => "record has no interface".to_string(),
        FallbackReason::LegacyEndpointNotUrl { endpoint: Some(e) } => {
            format!("endpoint {e:?} is not a URL")
        }
        FallbackReason::LegacyEndpointNotUrl { endpoint: None } => {
            "record has no endpoint".to_string()
        }
        FallbackReason::UnrecognizedMode { .. } => "unrecognized mode".to_string(),
    }
}
