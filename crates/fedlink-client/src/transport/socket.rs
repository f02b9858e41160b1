//! Duplex-channel transport.
//!
//! A single long-lived WebSocket carries typed envelopes in both directions.
//! Outbound operations send a request and then await the matching response
//! on the shared inbound stream, claiming messages by variant and sequence
//! number and ignoring everything else. Only one cycle may be in flight per
//! channel; callers drive their jobs one at a time.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use fedlink_core::{
    AuthOutcome, CoordinatorMessage, CycleDecision, CycleRequest, FederatedReport, WorkerMessage,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::Message;

use super::Transport;
use crate::error::ClientError;

const OUTBOUND_DEPTH: usize = 16;
const INBOUND_DEPTH: usize = 64;

pub struct SocketTransport {
    outbound: mpsc::Sender<WorkerMessage>,
    // The reader task owns the only sender; when the connection ends, every
    // subscription observes the channel closing.
    inbound: broadcast::Receiver<CoordinatorMessage>,
    seq: AtomicU64,
}

impl SocketTransport {
    /// Connect the channel, e.g. to `ws://coord.example:9000`.
    ///
    /// Reconnection and keep-alive are the embedding's concern. When the
    /// connection drops, pending and future exchanges fail with
    /// [`ClientError::ChannelClosed`].
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (ws, _) = tokio_tungstenite::connect_async(url).await?;
        let (mut sink, mut stream) = ws.split();

        let (outbound, mut outbound_rx) = mpsc::channel::<WorkerMessage>(OUTBOUND_DEPTH);
        let (inbound_tx, inbound) = broadcast::channel(INBOUND_DEPTH);

        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let text = match serde_json::to_string(&msg) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("unencodable outbound message: {e}");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    tracing::warn!("send failed, closing outbound: {e}");
                    break;
                }
            }
        });

        tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<CoordinatorMessage>(&text) {
                            // No receiver just means no exchange is pending.
                            Ok(msg) => {
                                let _ = inbound_tx.send(msg);
                            }
                            Err(e) => tracing::warn!("invalid inbound message: {e}"),
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("receive failed, closing inbound: {e}");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            outbound,
            inbound,
            seq: AtomicU64::new(1),
        })
    }

    #[cfg(test)]
    fn from_channels(
        outbound: mpsc::Sender<WorkerMessage>,
        inbound: broadcast::Receiver<CoordinatorMessage>,
    ) -> Self {
        Self {
            outbound,
            inbound,
            seq: AtomicU64::new(1),
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Send a request and await the first inbound message `claim` accepts.
    async fn exchange<T: Send>(
        &self,
        msg: WorkerMessage,
        mut claim: impl FnMut(CoordinatorMessage) -> Option<T> + Send,
    ) -> Result<T, ClientError> {
        // Subscribe before sending so the response cannot slip past.
        let mut rx = self.inbound.resubscribe();
        self.outbound
            .send(msg)
            .await
            .map_err(|_| ClientError::ChannelClosed)?;
        loop {
            match rx.recv().await {
                Ok(inbound) => {
                    if let Some(claimed) = claim(inbound) {
                        return Ok(claimed);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "inbound stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(ClientError::ChannelClosed),
            }
        }
    }
}

#[async_trait]
impl Transport for SocketTransport {
    async fn authenticate(&self, auth_token: Option<&str>) -> Result<String, ClientError> {
        let seq = self.next_seq();
        let request = WorkerMessage::AuthRequest {
            seq,
            auth_token: auth_token.map(str::to_owned),
        };
        let outcome = self
            .exchange(request, move |msg| match msg {
                CoordinatorMessage::AuthResponse { seq: got, outcome } if got == seq => {
                    Some(outcome)
                }
                _ => None,
            })
            .await?;
        match outcome {
            AuthOutcome::Granted { worker_id } => Ok(worker_id),
            AuthOutcome::Denied { error } => Err(ClientError::Denied { reason: error }),
        }
    }

    async fn negotiate(&self, request: CycleRequest) -> Result<CycleDecision, ClientError> {
        let seq = self.next_seq();
        let request = WorkerMessage::CycleRequest { seq, request };
        self.exchange(request, move |msg| match msg {
            CoordinatorMessage::CycleResponse { seq: got, decision } if got == seq => Some(decision),
            _ => None,
        })
        .await
    }

    async fn report(&self, report: FederatedReport) -> Result<(), ClientError> {
        // The duplex protocol defines no report acknowledgement; enqueueing
        // on the shared outbound channel is delivery here.
        let seq = self.next_seq();
        self.outbound
            .send(WorkerMessage::Report { seq, report })
            .await
            .map_err(|_| ClientError::ChannelClosed)
    }
}
