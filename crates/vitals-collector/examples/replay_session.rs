//! Replay a captured page load and print its Core Web Vitals report
//!
//! Usage: cargo run -p vitals-collector --example replay_session -- [session.json] [vitals.toml] [--json]

use anyhow::Result;
use futures::stream;
use std::env;
use std::path::PathBuf;
use vitals_collector::host::CapturedSession;
use vitals_collector::reporter::{OutputFormat, Reporter};
use vitals_collector::{CollectionHandle, VitalsAggregator, VitalsConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|arg| arg == "--json");
    let mut paths = args.iter().filter(|arg| !arg.starts_with("--"));

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let session_path = paths
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| manifest_dir.join("sessions/homepage.json"));
    let config = match paths.next() {
        Some(path) => VitalsConfig::from_file(path)?,
        None => VitalsConfig::from_file(manifest_dir.join("vitals.toml"))?,
    };

    println!("Replaying session: {}", session_path.display());
    let session = CapturedSession::from_file(&session_path)?;
    println!("  Records: {}", session.records.len());
    println!("  Resources: {}", session.host.resources.len());
    println!();

    let aggregator = VitalsAggregator::with_config(session.host, &config);
    let mut handle = CollectionHandle::spawn(aggregator, stream::iter(session.records));
    handle.drain().await;
    let report = handle.collect().await;

    let format = if json {
        OutputFormat::JsonPretty
    } else {
        OutputFormat::Summary
    };
    Reporter::new(format).report(&report)?;

    Ok(())
}
