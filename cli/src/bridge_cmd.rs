//! `airoute bridge`: host loop for trigger sites that talk over pipes.
//!
//! Input is newline-delimited [`TriggerEnvelope`] JSON. Every non-blank line
//! gets exactly one [`Ack`] line back; navigations are printed (or opened)
//! as resolutions finish, so they may interleave with later acks.

use std::io::Write;

use airoute_core::BridgeClient;
use airoute_core::bridge;
use airoute_protocol::Ack;
use airoute_protocol::TriggerEnvelope;
use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::GlobalArgs;
use crate::exit_codes;
use crate::report;
use crate::resolve_cmd::navigator;

#[derive(Debug, Parser)]
pub struct BridgeArgs {
    /// Open targets in the system browser instead of printing them
    #[arg(long)]
    pub open: bool,

    /// Requests buffered before the resolver picks them up
    #[arg(long, value_name = "N", default_value_t = bridge::DEFAULT_CAPACITY)]
    pub capacity: usize,
}

pub async fn run_bridge(global: &GlobalArgs, args: BridgeArgs) -> i32 {
    let engine = match global.engine() {
        Ok(engine) => engine,
        Err(err) => return report(&err),
    };

    let (client, server) = bridge::channel(args.capacity);
    let serving = tokio::spawn(server.serve(engine, navigator(args.open, true)));

    let forwarded = forward_lines(BufReader::new(tokio::io::stdin()), &client).await;
    drop(client);

    match serving.await {
        Ok(accepted) => tracing::debug!(accepted, "bridge drained"),
        Err(err) => tracing::error!("bridge server failed: {err}"),
    }

    match forwarded {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Forward each line to the bridge and write its ack to stdout.
pub async fn forward_lines<R>(reader: R, client: &BridgeClient) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let ack = acknowledge(trimmed, client).await;
        emit(&ack)?;
    }
    Ok(())
}

async fn acknowledge(line: &str, client: &BridgeClient) -> Ack {
    let envelope = match serde_json::from_str::<TriggerEnvelope>(line) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!("dropping malformed trigger: {err}");
            return Ack::Rejected {
                reason: format!("malformed trigger: {err}"),
            };
        }
    };
    client
        .send(envelope)
        .await
        .unwrap_or_else(|err| Ack::Rejected {
            reason: err.to_string(),
        })
}

fn emit(ack: &Ack) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, ack)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
