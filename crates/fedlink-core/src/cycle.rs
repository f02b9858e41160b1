//! Cycle negotiation types.

use crate::ConnectionMetrics;
use serde::{Deserialize, Serialize};

/// Eligibility request for one training cycle.
///
/// The metrics fields are forwarded exactly as the probe reported them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRequest {
    pub worker_id: String,
    pub model: String,
    pub version: String,
    pub ping: String,
    pub download: String,
    pub upload: String,
}

impl CycleRequest {
    pub fn new(
        worker_id: impl Into<String>,
        model: impl Into<String>,
        version: impl Into<String>,
        metrics: ConnectionMetrics,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            model: model.into(),
            version: version.into(),
            ping: metrics.ping,
            download: metrics.download,
            upload: metrics.upload,
        }
    }
}

/// Coordinator's decision on a cycle request.
///
/// Discriminated by `status`; a response is one or the other, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleDecision {
    /// The device is in: the key and ids authorize the artifact fetches.
    Accepted {
        request_key: String,
        model_id: u64,
        plan_id: u64,
        client_config: ClientConfig,
    },
    /// The device is out for this cycle.
    Rejected {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        /// Seconds after which the coordinator suggests asking again.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout: Option<u64>,
    },
}

/// Coordinator-issued hyperparameters for the training run.
///
/// Opaque to the client; handed to the execution engine unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientConfig(serde_json::Value);

impl ClientConfig {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Look up a single hyperparameter.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}
