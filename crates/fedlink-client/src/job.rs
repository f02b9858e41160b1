//! The cycle state machine.

use std::sync::Arc;
use std::time::Duration;

use fedlink_core::{ClientConfig, CycleDecision, CycleRequest, FederatedReport};

use crate::artifacts::{ArtifactDownloader, ModelArtifact, PlanArtifact};
use crate::error::ClientError;
use crate::gate::{self, DeviceStatus, Preconditions};
use crate::probe::ConnectionProbe;
use crate::transport::{ArtifactSource, Transport};

/// Where a job currently is in its single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    GatingPreconditions,
    Authenticating,
    MeasuringConnection,
    NegotiatingCycle,
    FetchingArtifacts,
    Ready,
    Error,
}

/// One federated-learning cycle attempt.
///
/// A job is single-use: [`Job::run`] drives the cycle to ready or error
/// exactly once. A second invocation fails with
/// [`ClientError::AlreadyStarted`]. There is no cancellation; once started,
/// the sequence runs to one of the two outcomes.
pub struct Job {
    model: String,
    version: String,
    preconditions: Preconditions,
    transport: Arc<dyn Transport>,
    artifacts: Arc<dyn ArtifactSource>,
    device: Arc<dyn DeviceStatus>,
    probe: Arc<dyn ConnectionProbe>,
    auth_token: Option<String>,
    worker_id: Option<String>,
    request_key: Option<String>,
    phase: Phase,
}

impl Job {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        model: String,
        version: String,
        transport: Arc<dyn Transport>,
        artifacts: Arc<dyn ArtifactSource>,
        device: Arc<dyn DeviceStatus>,
        probe: Arc<dyn ConnectionProbe>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            model,
            version,
            preconditions: Preconditions::default(),
            transport,
            artifacts,
            device,
            probe,
            auth_token,
            worker_id: None,
            request_key: None,
            phase: Phase::Idle,
        }
    }

    /// Require the device to be charging before the cycle starts.
    pub fn require_charging(mut self) -> Self {
        self.preconditions.require_charging = true;
        self
    }

    /// Require the active network to be Wi-Fi before the cycle starts.
    pub fn require_wifi(mut self) -> Self {
        self.preconditions.require_wifi = true;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Worker id assigned by the coordinator, once authenticated.
    pub fn worker_id(&self) -> Option<&str> {
        self.worker_id.as_deref()
    }

    /// Per-cycle key authorizing artifact fetch and reporting, once
    /// negotiated.
    pub fn request_key(&self) -> Option<&str> {
        self.request_key.as_deref()
    }

    /// Drive the cycle: gate on device preconditions, authenticate, measure
    /// the connection, negotiate, fetch both artifacts, and hand back the
    /// ready surface.
    ///
    /// `Ok` is the ready outcome; `Err` the error outcome, surfaced exactly
    /// once with nothing partial delivered.
    pub async fn run(&mut self) -> Result<ReadyCycle, ClientError> {
        if self.phase != Phase::Idle {
            return Err(ClientError::AlreadyStarted);
        }
        match self.drive().await {
            Ok(ready) => {
                self.enter(Phase::Ready);
                Ok(ready)
            }
            Err(e) => {
                tracing::warn!(phase = ?self.phase, error = %e, "cycle failed");
                self.phase = Phase::Error;
                Err(e)
            }
        }
    }

    async fn drive(&mut self) -> Result<ReadyCycle, ClientError> {
        self.enter(Phase::GatingPreconditions);
        gate::check_preconditions(self.device.as_ref(), self.preconditions).await?;

        self.enter(Phase::Authenticating);
        let worker_id = self
            .transport
            .authenticate(self.auth_token.as_deref())
            .await?;
        tracing::info!(%worker_id, model = %self.model, "authenticated");
        self.worker_id = Some(worker_id.clone());

        self.enter(Phase::MeasuringConnection);
        let metrics = self.probe.measure(&worker_id).await?;

        self.enter(Phase::NegotiatingCycle);
        let request = CycleRequest::new(
            worker_id.clone(),
            self.model.clone(),
            self.version.clone(),
            metrics,
        );
        let decision = self.transport.negotiate(request).await?;
        let (request_key, model_id, plan_id, client_config) = match decision {
            CycleDecision::Accepted {
                request_key,
                model_id,
                plan_id,
                client_config,
            } => (request_key, model_id, plan_id, client_config),
            CycleDecision::Rejected { reason, timeout } => {
                return Err(ClientError::Rejected {
                    reason,
                    retry_after: timeout.map(Duration::from_secs),
                });
            }
        };
        tracing::info!(%request_key, model_id, plan_id, "cycle accepted");
        self.request_key = Some(request_key.clone());

        self.enter(Phase::FetchingArtifacts);
        let downloader = ArtifactDownloader::new(self.artifacts.as_ref(), &worker_id, &request_key);
        let (plan, model) = downloader.fetch_both(model_id, plan_id).await?;

        Ok(ReadyCycle {
            plan,
            model,
            client_config,
            reporter: DiffReporter {
                transport: Arc::clone(&self.transport),
                worker_id,
                request_key,
            },
        })
    }

    fn enter(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "phase");
        self.phase = phase;
    }
}

/// Everything the caller needs to train and report: the staged plan, the
/// model parameters, the coordinator's hyperparameters, and the reporter
/// bound to this cycle.
#[derive(Debug)]
pub struct ReadyCycle {
    pub plan: PlanArtifact,
    pub model: ModelArtifact,
    pub client_config: ClientConfig,
    pub reporter: DiffReporter,
}

/// Sends the externally computed diff back to the coordinator.
///
/// A reporter only exists once both the worker id and request key do, so a
/// report can never go out with either missing. Sending consumes it: one
/// report per cycle.
pub struct DiffReporter {
    transport: Arc<dyn Transport>,
    worker_id: String,
    request_key: String,
}

impl std::fmt::Debug for DiffReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffReporter")
            .field("worker_id", &self.worker_id)
            .field("request_key", &self.request_key)
            .finish_non_exhaustive()
    }
}

impl DiffReporter {
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn request_key(&self) -> &str {
        &self.request_key
    }

    /// Deliver the diff. Delivery failures are returned, not swallowed.
    pub async fn send(self, diff: Vec<u8>) -> Result<(), ClientError> {
        tracing::debug!(worker_id = %self.worker_id, bytes = diff.len(), "reporting diff");
        let report = FederatedReport::new(self.worker_id, self.request_key, diff);
        self.transport.report(report).await?;
        tracing::debug!("cycle done");
        Ok(())
    }
}
