//! Network-quality readings reported to the coordinator.

use serde::{Deserialize, Serialize};

/// Round-trip latency and throughput measured against the coordinator.
///
/// Values are carried as strings and forwarded to the coordinator unmodified;
/// the coordinator decides cycle eligibility from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionMetrics {
    /// Round-trip latency in milliseconds. May be a fixed placeholder when
    /// the probe does not measure it directly.
    pub ping: String,
    /// Download throughput.
    pub download: String,
    /// Upload throughput.
    pub upload: String,
}

impl ConnectionMetrics {
    pub fn new(
        ping: impl Into<String>,
        download: impl Into<String>,
        upload: impl Into<String>,
    ) -> Self {
        Self {
            ping: ping.into(),
            download: download.into(),
            upload: upload.into(),
        }
    }
}
