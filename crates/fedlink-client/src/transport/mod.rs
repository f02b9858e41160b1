//! The capability interface over both transport variants.
//!
//! Everything that depends on the transport kind lives under this module;
//! the rest of the crate sees [`Transport`] and [`ArtifactSource`] only.

mod http;
mod socket;

pub use http::HttpTransport;
pub use socket::SocketTransport;

use std::fmt;

use async_trait::async_trait;
use fedlink_core::{CycleDecision, CycleRequest, FederatedReport};

use crate::error::ClientError;

/// Protocol operations both variants expose.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Exchange the optional token for a coordinator-assigned worker id.
    async fn authenticate(&self, auth_token: Option<&str>) -> Result<String, ClientError>;

    /// Submit a cycle request and return the coordinator's decision,
    /// accepted or rejected, undigested.
    async fn negotiate(&self, request: CycleRequest) -> Result<CycleDecision, ClientError>;

    /// Deliver the terminal report of a cycle.
    async fn report(&self, report: FederatedReport) -> Result<(), ClientError>;
}

/// Artifact retrieval, exposed by the request/response variant only.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Fetch one artifact's serialized bytes, scoped by worker id and
    /// request key.
    async fn fetch(
        &self,
        kind: ArtifactKind,
        id: u64,
        worker_id: &str,
        request_key: &str,
    ) -> Result<Vec<u8>, ClientError>;
}

/// Which artifact a fetch addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Plan,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => write!(f, "model"),
            ArtifactKind::Plan => write!(f, "plan"),
        }
    }
}
