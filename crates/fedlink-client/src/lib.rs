//! Client-side cycle orchestrator for the fedlink protocol.
//!
//! A [`Client`] connects to a coordinator over one of two transports and
//! hands out single-use [`Job`]s. Each job gates on device preconditions,
//! authenticates, measures the connection, negotiates a cycle, fetches the
//! plan and model concurrently, and yields a [`ReadyCycle`]; its
//! [`DiffReporter`] sends the trained diff back.

mod artifacts;
mod client;
mod error;
mod gate;
mod job;
mod probe;
mod transport;

pub use artifacts::{ModelArtifact, PlanArtifact};
pub use client::{Client, TransportKind};
pub use error::ClientError;
pub use gate::{
    DeviceStatus, NetworkKind, PluggedIn, PreconditionFailure, Preconditions, check_preconditions,
};
pub use job::{DiffReporter, Job, Phase, ReadyCycle};
pub use probe::{ConnectionProbe, FixedProbe};
pub use transport::{ArtifactKind, ArtifactSource, HttpTransport, SocketTransport, Transport};
