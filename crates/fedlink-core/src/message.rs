//! Duplex-channel protocol messages.
//!
//! One long-lived channel carries these envelopes in both directions. Every
//! request carries a `seq` echoed by its response, so a pending call can
//! claim its answer off the shared inbound stream and ignore everything else.

use crate::{AuthOutcome, CycleDecision, CycleRequest, FederatedReport};
use serde::{Deserialize, Serialize};

/// Messages sent from the worker to the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerMessage {
    /// Authenticate with the coordinator.
    AuthRequest {
        seq: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auth_token: Option<String>,
    },
    /// Ask to participate in a cycle.
    CycleRequest { seq: u64, request: CycleRequest },
    /// Report the trained diff. No response is defined for this message.
    Report { seq: u64, report: FederatedReport },
}

/// Messages sent from the coordinator to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoordinatorMessage {
    /// Answer to the auth request with the same `seq`.
    AuthResponse { seq: u64, outcome: AuthOutcome },
    /// Answer to the cycle request with the same `seq`.
    CycleResponse { seq: u64, decision: CycleDecision },
    /// Failure outside any pending exchange.
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seq: Option<u64>,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_request_omits_missing_token() {
        let msg = WorkerMessage::AuthRequest {
            seq: 1,
            auth_token: None,
        };
        let raw = serde_json::to_value(&msg).unwrap();
        assert_eq!(raw, json!({ "type": "auth_request", "seq": 1 }));
    }

    #[test]
    fn decode_auth_response_granted() {
        let raw = r#"{"type":"auth_response","seq":7,"outcome":{"worker_id":"w1"}}"#;
        let msg: CoordinatorMessage = serde_json::from_str(raw).unwrap();
        match msg {
            CoordinatorMessage::AuthResponse {
                seq,
                outcome: AuthOutcome::Granted { worker_id },
            } => {
                assert_eq!(seq, 7);
                assert_eq!(worker_id, "w1");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn decode_auth_response_denied() {
        let raw = r#"{"type":"auth_response","seq":7,"outcome":{"error":"bad token"}}"#;
        let msg: CoordinatorMessage = serde_json::from_str(raw).unwrap();
        match msg {
            CoordinatorMessage::AuthResponse {
                outcome: AuthOutcome::Denied { error },
                ..
            } => assert_eq!(error, "bad token"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn decode_cycle_response() {
        let raw = json!({
            "type": "cycle_response",
            "seq": 2,
            "decision": { "status": "rejected", "reason": "pool full", "timeout": 60 },
        });
        let msg: CoordinatorMessage = serde_json::from_value(raw).unwrap();
        match msg {
            CoordinatorMessage::CycleResponse {
                decision: CycleDecision::Rejected { reason, timeout },
                ..
            } => {
                assert_eq!(reason.as_deref(), Some("pool full"));
                assert_eq!(timeout, Some(60));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
