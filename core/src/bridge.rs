//! Request/response channel between trigger sites and the engine.
//!
//! [`channel`] hands out any number of [`BridgeClient`]s and exactly one
//! [`BridgeServer`]. Serving consumes the server, so a second handler can
//! never be registered. Requests sent before the server starts serving are
//! buffered rather than lost; once the server is gone, sends fail with
//! [`BridgeError::Unavailable`].

use std::sync::Arc;

use airoute_protocol::Ack;
use airoute_protocol::TriggerEnvelope;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::task::JoinSet;

use crate::engine::ResolutionEngine;
use crate::engine::ResolutionRequest;
use crate::navigator::Navigator;

pub const DEFAULT_CAPACITY: usize = 64;

type Pending = (TriggerEnvelope, oneshot::Sender<Ack>);

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("no resolver is listening")]
    Unavailable,

    #[error("resolver went away before acknowledging")]
    Dropped,
}

pub fn channel(capacity: usize) -> (BridgeClient, BridgeServer) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (BridgeClient { tx }, BridgeServer { rx })
}

#[derive(Debug, Clone)]
pub struct BridgeClient {
    tx: mpsc::Sender<Pending>,
}

impl BridgeClient {
    /// Send a trigger and wait for the acknowledgement (not the resolution).
    pub async fn send(&self, envelope: TriggerEnvelope) -> Result<Ack, BridgeError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send((envelope, ack_tx))
            .await
            .map_err(|_| BridgeError::Unavailable)?;
        ack_rx.await.map_err(|_| BridgeError::Dropped)
    }

    /// Fire-and-forget form used by trigger sites: failures are logged as
    /// warnings and not retried.
    pub async fn forward(&self, envelope: TriggerEnvelope) -> Option<Ack> {
        match self.send(envelope).await {
            Ok(ack) => Some(ack),
            Err(err) => {
                tracing::warn!("could not reach resolver: {err}");
                None
            }
        }
    }
}

pub struct BridgeServer {
    rx: mpsc::Receiver<Pending>,
}

impl BridgeServer {
    /// Acknowledge each request immediately and resolve it on its own task.
    ///
    /// Returns once every client is dropped and all in-flight resolutions
    /// have navigated. The value is the number of requests accepted.
    pub async fn serve(
        mut self,
        engine: Arc<ResolutionEngine>,
        navigator: Arc<dyn Navigator>,
    ) -> usize {
        let mut tasks = JoinSet::new();
        let mut accepted = 0usize;

        loop {
            tokio::select! {
                incoming = self.rx.recv() => {
                    let Some((envelope, ack)) = incoming else {
                        break;
                    };
                    accepted += 1;
                    if ack.send(Ack::Resolving).is_err() {
                        tracing::debug!("trigger stopped waiting for ack");
                    }

                    let engine = Arc::clone(&engine);
                    let navigator = Arc::clone(&navigator);
                    let request = ResolutionRequest::from(envelope);
                    tasks.spawn(async move {
                        engine.handle(request, navigator.as_ref()).await;
                    });
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    log_join(joined);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }
        tracing::debug!(accepted, "bridge closed");
        accepted
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        tracing::error!("resolution task failed: {err}");
    }
}
