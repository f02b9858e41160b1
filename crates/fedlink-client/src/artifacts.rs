//! Concurrent retrieval of a cycle's artifacts.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ClientError;
use crate::transport::{ArtifactKind, ArtifactSource};

/// Decoded model-parameter blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifact {
    params: Vec<u8>,
}

impl ModelArtifact {
    pub(crate) fn decode(bytes: Vec<u8>) -> Result<Self, ClientError> {
        if bytes.is_empty() {
            return Err(ClientError::EmptyArtifact {
                kind: ArtifactKind::Model,
            });
        }
        Ok(Self { params: bytes })
    }

    /// The serialized parameters, as fetched.
    pub fn params(&self) -> &[u8] {
        &self.params
    }
}

/// Decoded training plan plus the on-disk handle the execution engine loads
/// from.
#[derive(Debug)]
pub struct PlanArtifact {
    ops: Vec<u8>,
    file: NamedTempFile,
}

impl PlanArtifact {
    /// Decode the plan blob and stage its executable payload in a fresh
    /// temporary file. The file lives as long as the artifact does.
    pub(crate) fn decode(bytes: Vec<u8>) -> Result<Self, ClientError> {
        if bytes.is_empty() {
            return Err(ClientError::EmptyArtifact {
                kind: ArtifactKind::Plan,
            });
        }
        let mut file = NamedTempFile::new()?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(Self { ops: bytes, file })
    }

    pub fn ops(&self) -> &[u8] {
        &self.ops
    }

    /// Path the external execution engine loads the plan from.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Fetches the plan and model for an accepted cycle.
pub(crate) struct ArtifactDownloader<'a> {
    source: &'a dyn ArtifactSource,
    worker_id: &'a str,
    request_key: &'a str,
}

impl<'a> ArtifactDownloader<'a> {
    pub(crate) fn new(
        source: &'a dyn ArtifactSource,
        worker_id: &'a str,
        request_key: &'a str,
    ) -> Self {
        Self {
            source,
            worker_id,
            request_key,
        }
    }

    /// Dispatch both fetches concurrently and resolve once both blobs are
    /// fetched and decoded. Any single failure fails the whole step; nothing
    /// partial is delivered.
    pub(crate) async fn fetch_both(
        &self,
        model_id: u64,
        plan_id: u64,
    ) -> Result<(PlanArtifact, ModelArtifact), ClientError> {
        let plan = self
            .source
            .fetch(ArtifactKind::Plan, plan_id, self.worker_id, self.request_key);
        let model = self
            .source
            .fetch(ArtifactKind::Model, model_id, self.worker_id, self.request_key);
        let (plan_bytes, model_bytes) = tokio::try_join!(plan, model)?;
        Ok((
            PlanArtifact::decode(plan_bytes)?,
            ModelArtifact::decode(model_bytes)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeSource {
        model: Result<Vec<u8>, ()>,
        plan: Result<Vec<u8>, ()>,
    }

    #[async_trait]
    impl ArtifactSource for FakeSource {
        async fn fetch(
            &self,
            kind: ArtifactKind,
            _id: u64,
            _worker_id: &str,
            _request_key: &str,
        ) -> Result<Vec<u8>, ClientError> {
            let blob = match kind {
                ArtifactKind::Model => &self.model,
                ArtifactKind::Plan => &self.plan,
            };
            blob.clone().map_err(|()| ClientError::Status {
                status: 500,
                path: "federated/get-model",
            })
        }
    }

    #[tokio::test]
    async fn both_artifacts_resolve_together() {
        let source = FakeSource {
            model: Ok(vec![1, 2]),
            plan: Ok(vec![3, 4, 5]),
        };
        let downloader = ArtifactDownloader::new(&source, "w1", "rk1");
        let (plan, model) = downloader.fetch_both(1, 2).await.unwrap();

        assert_eq!(model.params(), &[1, 2]);
        assert_eq!(plan.ops(), &[3, 4, 5]);
        // The executable payload is staged on disk for the execution engine.
        assert_eq!(std::fs::read(plan.path()).unwrap(), vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn one_failed_fetch_fails_the_step() {
        let source = FakeSource {
            model: Err(()),
            plan: Ok(vec![3]),
        };
        let downloader = ArtifactDownloader::new(&source, "w1", "rk1");
        match downloader.fetch_both(1, 2).await {
            Err(ClientError::Status { status: 500, .. }) => {}
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_blob_is_a_decode_failure() {
        let source = FakeSource {
            model: Ok(vec![]),
            plan: Ok(vec![3]),
        };
        let downloader = ArtifactDownloader::new(&source, "w1", "rk1");
        match downloader.fetch_both(1, 2).await {
            Err(ClientError::EmptyArtifact {
                kind: ArtifactKind::Model,
            }) => {}
            other => panic!("expected empty artifact, got {other:?}"),
        }
    }
}
