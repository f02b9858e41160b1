//! Client error taxonomy.

use std::time::Duration;

use crate::gate::PreconditionFailure;
use crate::transport::ArtifactKind;

/// Failures that end a cycle.
///
/// Every failure short-circuits the job into its error state and is surfaced
/// exactly once; nothing is retried internally. Whether and when to start a
/// new job afterwards is the caller's decision.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Device preconditions not met; no network activity was attempted.
    #[error(transparent)]
    Precondition(#[from] PreconditionFailure),

    /// The endpoint could not be used as given.
    #[error("bad endpoint: {0}")]
    Endpoint(String),

    /// Request/response transport failure (connection or body decode).
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Duplex transport failure.
    #[error("socket transport error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The coordinator answered a request with a non-success status.
    #[error("coordinator returned {status} for {path}")]
    Status { status: u16, path: &'static str },

    /// The duplex channel shut down under a pending exchange.
    #[error("duplex channel closed")]
    ChannelClosed,

    /// The coordinator refused authentication.
    #[error("authentication denied: {reason}")]
    Denied { reason: String },

    /// The coordinator turned the device away for this cycle.
    #[error("cycle rejected: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Rejected {
        reason: Option<String>,
        /// Coordinator-suggested wait before a new job asks again.
        retry_after: Option<Duration>,
    },

    /// A fetched artifact failed to decode.
    #[error("empty {kind} artifact")]
    EmptyArtifact { kind: ArtifactKind },

    /// Staging the plan payload on disk failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// `Job::run` was invoked a second time; one job drives exactly one
    /// cycle.
    #[error("job already started")]
    AlreadyStarted,
}
