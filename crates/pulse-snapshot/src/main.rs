//! pulse-snapshot: run one dashboard refresh cycle against a JSON fixture and
//! print the resulting snapshot.
//!
//! Usage:
//!   cargo run -p pulse-snapshot -- --fixture crates/pulse-snapshot/fixtures/sample.json
//!   cargo run -p pulse-snapshot -- --fixture data.json --now 2024-06-05T10:00:00Z --compact

mod fixture;

use anyhow::Context;
use chrono::{DateTime, Utc};
use fixture::Fixture;
use pulse_core::PipelineConfig;
use pulse_orchestrator::PulseOrchestrator;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pulse_snapshot=info,pulse_orchestrator=info".into());
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    let compact = args.iter().any(|a| a == "--compact");

    let Some(fixture_path) = args
        .iter()
        .position(|a| a == "--fixture")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
    else {
        eprintln!("Usage:");
        eprintln!("  pulse-snapshot --fixture PATH [--now RFC3339] [--compact]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --now RFC3339   Evaluate as of this instant (default: current time)");
        eprintln!("  --compact       Single-line JSON output");
        std::process::exit(1);
    };

    let now: DateTime<Utc> = match args
        .iter()
        .position(|a| a == "--now")
        .and_then(|i| args.get(i + 1))
    {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --now value '{raw}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let config = PipelineConfig::from_env().context("Failed to load pipeline configuration")?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Scaled instruments: {:?}", config.scaled_instruments);
    tracing::info!("  News lookback: {}h", config.lookback_window.num_hours());

    let mut fixture = Fixture::load(&fixture_path)?;
    let layout = fixture.layout.take().unwrap_or_default();
    let fixture = Arc::new(fixture);

    let orchestrator = PulseOrchestrator::new(fixture.clone(), fixture, layout, &config);
    let snapshot = orchestrator.refresh(now).await;

    let output = if compact {
        serde_json::to_string(&snapshot)?
    } else {
        serde_json::to_string_pretty(&snapshot)?
    };
    println!("{output}");

    Ok(())
}
