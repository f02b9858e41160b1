//! Authentication exchange types.

use serde::{Deserialize, Serialize};

/// Body of the authentication step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Token pre-shared with the coordinator, if the deployment uses one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

/// Coordinator's answer to an authentication request.
///
/// Keyed on field presence: a granted response carries the assigned worker
/// id, a denied one carries the error detail. Never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthOutcome {
    /// Authentication succeeded; the worker id scopes the rest of the cycle.
    Granted { worker_id: String },
    /// Authentication failed.
    Denied { error: String },
}
