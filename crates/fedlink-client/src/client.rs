//! Client entry point: endpoint, transport choice, job creation.

use std::sync::Arc;

use crate::error::ClientError;
use crate::gate::{DeviceStatus, PluggedIn};
use crate::job::Job;
use crate::probe::{ConnectionProbe, FixedProbe};
use crate::transport::{ArtifactSource, HttpTransport, SocketTransport, Transport};

/// Which transport variant a client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Independent request/response calls under the base endpoint.
    Http,
    /// One persistent duplex channel.
    Socket,
}

/// Entry point for cycle participation against one coordinator.
///
/// Immutable once connected: the endpoint, transport kind and auth token are
/// fixed, and every job this client creates shares the same transport. Holds
/// no per-cycle state.
pub struct Client {
    transport: Arc<dyn Transport>,
    artifacts: Arc<dyn ArtifactSource>,
    device: Arc<dyn DeviceStatus>,
    probe: Arc<dyn ConnectionProbe>,
    auth_token: Option<String>,
}

impl Client {
    /// Connect to `endpoint` with the given transport kind.
    ///
    /// `http(s)://` endpoints pair with [`TransportKind::Http`], `ws(s)://`
    /// with [`TransportKind::Socket`]. Artifact downloads always go over the
    /// request/response endpoint; a socket client derives it from its
    /// `ws(s)://` URL.
    pub async fn connect(
        endpoint: &str,
        kind: TransportKind,
        auth_token: Option<String>,
    ) -> Result<Self, ClientError> {
        let (transport, artifacts): (Arc<dyn Transport>, Arc<dyn ArtifactSource>) = match kind {
            TransportKind::Http => {
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    return Err(ClientError::Endpoint(format!(
                        "expected an http(s) endpoint, got {endpoint}"
                    )));
                }
                let http = Arc::new(HttpTransport::new(endpoint));
                (http.clone() as Arc<dyn Transport>, http)
            }
            TransportKind::Socket => {
                let artifact_endpoint = http_sibling(endpoint)?;
                let socket = Arc::new(SocketTransport::connect(endpoint).await?);
                (socket, Arc::new(HttpTransport::new(artifact_endpoint)))
            }
        };
        Ok(Self::from_parts(transport, artifacts, auth_token))
    }

    /// Assemble a client from an already-built transport and artifact
    /// source. This is the injection seam for embeddings and tests.
    pub fn from_parts(
        transport: Arc<dyn Transport>,
        artifacts: Arc<dyn ArtifactSource>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            transport,
            artifacts,
            device: Arc::new(PluggedIn),
            probe: Arc::new(FixedProbe::default()),
            auth_token,
        }
    }

    /// Replace the device-status source used by the precondition gate.
    pub fn with_device(mut self, device: Arc<dyn DeviceStatus>) -> Self {
        self.device = device;
        self
    }

    /// Replace the connection probe consulted before negotiation.
    pub fn with_probe(mut self, probe: Arc<dyn ConnectionProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Create a single-use job for one cycle of `model`/`version`.
    pub fn job(&self, model: impl Into<String>, version: impl Into<String>) -> Job {
        Job::new(
            model.into(),
            version.into(),
            Arc::clone(&self.transport),
            Arc::clone(&self.artifacts),
            Arc::clone(&self.device),
            Arc::clone(&self.probe),
            self.auth_token.clone(),
        )
    }
}

/// Derive the request/response endpoint for artifact downloads from a duplex
/// endpoint.
fn http_sibling(endpoint: &str) -> Result<String, ClientError> {
    if let Some(rest) = endpoint.strip_prefix("ws://") {
        Ok(format!("http://{rest}"))
    } else if let Some(rest) = endpoint.strip_prefix("wss://") {
        Ok(format!("https://{rest}"))
    } else {
        Err(ClientError::Endpoint(format!(
            "expected a ws(s) endpoint, got {endpoint}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_swaps_the_scheme() {
        assert_eq!(
            http_sibling("ws://coord.example:9000").unwrap(),
            "http://coord.example:9000"
        );
        assert_eq!(
            http_sibling("wss://coord.example").unwrap(),
            "https://coord.example"
        );
    }

    #[test]
    fn sibling_rejects_non_ws_schemes() {
        assert!(matches!(
            http_sibling("http://coord.example"),
            Err(ClientError::Endpoint(_))
        ));
    }

    #[tokio::test]
    async fn http_kind_rejects_ws_endpoints() {
        match Client::connect("ws://coord.example", TransportKind::Http, None).await {
            Err(ClientError::Endpoint(_)) => {}
            _ => panic!("expected an endpoint error"),
        }
    }
}
