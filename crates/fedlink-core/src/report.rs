//! Terminal report of a cycle.

use serde::{Deserialize, Serialize};

/// The trained diff sent back to the coordinator, keyed by the worker id and
/// request key captured at negotiation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedReport {
    pub worker_id: String,
    pub request_key: String,
    /// Opaque result of local training. Base64 on the wire.
    #[serde(with = "base64_bytes")]
    pub diff: Vec<u8>,
}

impl FederatedReport {
    pub fn new(
        worker_id: impl Into<String>,
        request_key: impl Into<String>,
        diff: Vec<u8>,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            request_key: request_key.into(),
            diff,
        }
    }
}

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_is_base64_on_the_wire() {
        let report = FederatedReport::new("w1", "rk1", vec![1, 2, 3]);
        let raw = serde_json::to_value(&report).unwrap();
        assert_eq!(raw["worker_id"], "w1");
        assert_eq!(raw["request_key"], "rk1");
        assert_eq!(raw["diff"], "AQID");
    }

    #[test]
    fn decode_restores_bytes() {
        let raw = r#"{"worker_id":"w1","request_key":"rk1","diff":"AQID"}"#;
        let report: FederatedReport = serde_json::from_str(raw).unwrap();
        assert_eq!(report.diff, vec![1, 2, 3]);
    }
}
