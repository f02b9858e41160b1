//! Network-quality measurement boundary.

use async_trait::async_trait;
use fedlink_core::ConnectionMetrics;

use crate::error::ClientError;

/// Measures round-trip latency and throughput against the coordinator.
///
/// The measurement implementation is external; the cycle depends only on the
/// returned triple, which the coordinator uses to decide eligibility.
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    async fn measure(&self, worker_id: &str) -> Result<ConnectionMetrics, ClientError>;
}

/// Probe that reports a preset triple.
///
/// Ping in particular may be a static placeholder when nothing measures it
/// directly.
#[derive(Debug, Clone)]
pub struct FixedProbe {
    metrics: ConnectionMetrics,
}

impl FixedProbe {
    pub fn new(metrics: ConnectionMetrics) -> Self {
        Self { metrics }
    }
}

impl Default for FixedProbe {
    fn default() -> Self {
        Self::new(ConnectionMetrics::new("1", "1.0", "1.0"))
    }
}

#[async_trait]
impl ConnectionProbe for FixedProbe {
    async fn measure(&self, _worker_id: &str) -> Result<ConnectionMetrics, ClientError> {
        Ok(self.metrics.clone())
    }
}
