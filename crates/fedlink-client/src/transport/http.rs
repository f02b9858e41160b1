//! Request/response transport.
//!
//! Each protocol step is an independent outbound call to a fixed path under
//! the base endpoint. Failures surface as-is; nothing is retried here.

use async_trait::async_trait;
use fedlink_core::{AuthOutcome, AuthRequest, CycleDecision, CycleRequest, FederatedReport};

use super::{ArtifactKind, ArtifactSource, Transport};
use crate::error::ClientError;

const AUTH_PATH: &str = "federated/authenticate";
const CYCLE_PATH: &str = "federated/cycle-request";
const MODEL_PATH: &str = "federated/get-model";
const PLAN_PATH: &str = "federated/get-plan";
const REPORT_PATH: &str = "federated/report";

pub struct HttpTransport {
    http: reqwest::Client,
    base: String,
}

impl HttpTransport {
    /// Transport rooted at `base`, e.g. `http://coord.example:9000`.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base)
    }

    fn checked(
        response: reqwest::Response,
        path: &'static str,
    ) -> Result<reqwest::Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ClientError::Status {
                status: response.status().as_u16(),
                path,
            })
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn authenticate(&self, auth_token: Option<&str>) -> Result<String, ClientError> {
        let body = AuthRequest {
            auth_token: auth_token.map(str::to_owned),
        };
        let response = self.http.post(self.url(AUTH_PATH)).json(&body).send().await?;
        let outcome: AuthOutcome = Self::checked(response, AUTH_PATH)?.json().await?;
        match outcome {
            AuthOutcome::Granted { worker_id } => Ok(worker_id),
            AuthOutcome::Denied { error } => Err(ClientError::Denied { reason: error }),
        }
    }

    async fn negotiate(&self, request: CycleRequest) -> Result<CycleDecision, ClientError> {
        let response = self
            .http
            .post(self.url(CYCLE_PATH))
            .json(&request)
            .send()
            .await?;
        Ok(Self::checked(response, CYCLE_PATH)?.json().await?)
    }

    async fn report(&self, report: FederatedReport) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(REPORT_PATH))
            .json(&report)
            .send()
            .await?;
        let response = Self::checked(response, REPORT_PATH)?;
        // The response body carries nothing the cycle needs.
        if let Ok(body) = response.text().await {
            if !body.is_empty() {
                tracing::debug!(%body, "report acknowledged");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ArtifactSource for HttpTransport {
    async fn fetch(
        &self,
        kind: ArtifactKind,
        id: u64,
        worker_id: &str,
        request_key: &str,
    ) -> Result<Vec<u8>, ClientError> {
        let (path, id_param) = match kind {
            ArtifactKind::Model => (MODEL_PATH, "model_id"),
            ArtifactKind::Plan => (PLAN_PATH, "plan_id"),
        };
        let mut query = vec![
            ("worker_id", worker_id.to_owned()),
            (id_param, id.to_string()),
            ("request_key", request_key.to_owned()),
        ];
        if kind == ArtifactKind::Plan {
            // The execution engine loads plans as torchscript.
            query.push(("receive_operations_as", "torchscript".to_owned()));
        }
        let response = self.http.get(self.url(path)).query(&query).send().await?;
        let bytes = Self::checked(response, path)?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
