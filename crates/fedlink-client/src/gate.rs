//! Device preconditions checked before any network activity.

use async_trait::async_trait;

/// The active network interface kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    Wifi,
    Wired,
    Cellular,
    Unknown,
}

/// Boundary over the device's battery and network sensing.
///
/// Implementations come from the embedding platform; [`PluggedIn`] suits
/// hosts without meaningful readings.
#[async_trait]
pub trait DeviceStatus: Send + Sync {
    /// Whether the device is currently charging.
    fn charging(&self) -> bool;

    /// Observe the active network interface.
    async fn network(&self) -> NetworkKind;
}

/// Always-eligible device status for hosts that are not battery powered.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluggedIn;

#[async_trait]
impl DeviceStatus for PluggedIn {
    fn charging(&self) -> bool {
        true
    }

    async fn network(&self) -> NetworkKind {
        NetworkKind::Wifi
    }
}

/// Requirements a job imposes on the device before starting a cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preconditions {
    pub require_charging: bool,
    pub require_wifi: bool,
}

/// Unmet device precondition. Terminal for the cycle, reported before any
/// network call is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionFailure {
    #[error("device is not charging")]
    NotCharging,
    #[error("active network is not wi-fi")]
    NotOnWifi,
}

/// Evaluate device preconditions.
///
/// The charging state is read synchronously, so a not-charging device fails
/// before anything suspends. Observing the network interface is the single
/// suspension point before transport activity.
pub async fn check_preconditions(
    device: &dyn DeviceStatus,
    wants: Preconditions,
) -> Result<(), PreconditionFailure> {
    if wants.require_charging && !device.charging() {
        return Err(PreconditionFailure::NotCharging);
    }
    if wants.require_wifi && device.network().await != NetworkKind::Wifi {
        return Err(PreconditionFailure::NotOnWifi);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeDevice {
        charging: bool,
        network: NetworkKind,
    }

    #[async_trait]
    impl DeviceStatus for FakeDevice {
        fn charging(&self) -> bool {
            self.charging
        }

        async fn network(&self) -> NetworkKind {
            self.network
        }
    }

    #[tokio::test]
    async fn not_charging_fails_first() {
        let device = FakeDevice {
            charging: false,
            network: NetworkKind::Cellular,
        };
        let wants = Preconditions {
            require_charging: true,
            require_wifi: true,
        };
        assert_eq!(
            check_preconditions(&device, wants).await,
            Err(PreconditionFailure::NotCharging)
        );
    }

    #[tokio::test]
    async fn cellular_fails_wifi_requirement() {
        let device = FakeDevice {
            charging: true,
            network: NetworkKind::Cellular,
        };
        let wants = Preconditions {
            require_wifi: true,
            ..Default::default()
        };
        assert_eq!(
            check_preconditions(&device, wants).await,
            Err(PreconditionFailure::NotOnWifi)
        );
    }

    #[tokio::test]
    async fn unset_requirements_pass_anything() {
        let device = FakeDevice {
            charging: false,
            network: NetworkKind::Unknown,
        };
        assert_eq!(
            check_preconditions(&device, Preconditions::default()).await,
            Ok(())
        );
    }
}
