//! Core types for the fedlink cycle protocol.
//!
//! This crate provides the protocol primitives shared by both transports:
//! the authentication exchange, cycle negotiation, the duplex envelopes, and
//! the terminal report. The client crate drives the cycle; this crate defines
//! what goes over the wire.

mod auth;
mod cycle;
mod message;
mod metrics;
mod report;

pub use auth::{AuthOutcome, AuthRequest};
pub use cycle::{ClientConfig, CycleDecision, CycleRequest};
pub use message::{CoordinatorMessage, WorkerMessage};
pub use metrics::ConnectionMetrics;
pub use report::FederatedReport;
