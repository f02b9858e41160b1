//! One federated-learning cycle against a local coordinator.
//!
//! Start a coordinator, then:
//!   cargo run --example mnist_cycle -- --endpoint http://localhost:9000
//!   cargo run --example mnist_cycle -- --endpoint ws://localhost:9000

use std::sync::Arc;

use fedlink_client::{Client, FixedProbe, TransportKind};
use fedlink_core::ConnectionMetrics;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mnist_cycle=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let endpoint = parse_arg(&args, "--endpoint").unwrap_or_else(|| "http://localhost:9000".into());
    let model = parse_arg(&args, "--model").unwrap_or_else(|| "mnist".into());
    let version = parse_arg(&args, "--version").unwrap_or_else(|| "1.0".into());

    let kind = if endpoint.starts_with("ws") {
        TransportKind::Socket
    } else {
        TransportKind::Http
    };

    tracing::info!("Requesting a {model} {version} cycle from {endpoint}");

    let client = Client::connect(&endpoint, kind, None).await?.with_probe(Arc::new(
        FixedProbe::new(ConnectionMetrics::new("8", "46.0", "23.0")),
    ));

    let mut job = client.job(model, version);
    let ready = job.run().await?;

    tracing::info!("Cycle ready; plan staged at {}", ready.plan.path().display());
    tracing::info!("Model parameters: {} bytes", ready.model.params().len());

    // Training happens outside this crate; report the parameters back
    // untrained so the example exercises the full protocol.
    let diff = ready.model.params().to_vec();
    ready.reporter.send(diff).await?;
    tracing::info!("Diff reported, cycle complete");

    Ok(())
}

fn parse_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
