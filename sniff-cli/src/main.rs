//! TracerFi Sniffer
//!
//! Runs the scan sequence (TracerFi announce, channel sweep, BLE scan) and
//! prints every result as it arrives.

mod cli;
mod demo;
mod settings;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sniff_proto::ScanResult;
use sniff_scan::{ResultSink, ScanSettings, Sniffer};
use sniff_sim::{CollectedResult, VirtualRadio};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands, ScanArgs};
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sniffer=info,sniff_scan=info,sniff_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let path = match cli.config {
        Some(path) => path,
        None => Settings::default_path().context("Could not determine settings path")?,
    };

    match cli.command {
        Commands::Scan(args) => scan(&path, args).await,
        Commands::Init { force } => init(&path, force),
        Commands::Show => {
            let settings = Settings::load(&path);
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

async fn scan(path: &Path, args: ScanArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load(path);
    args.apply(&mut settings.scan);
    settings.scan.validate()?;

    info!(
        "Scanning {} with {} (expected {:?} per pass)",
        settings.scan.mask,
        settings.radio.id,
        settings.scan.expected_duration()
    );

    let radio = demo::demo_radio(settings.radio.clone())?;
    let sink: Arc<dyn ResultSink> = if args.json {
        Arc::new(print_json)
    } else {
        Arc::new(|result: &ScanResult<'_>| println!("{result}"))
    };

    let mut sniffer = Sniffer::new(radio, sink);
    run_passes(&mut sniffer, &settings.scan, args.count).await
}

/// Run the sequence `count` times
///
/// The radio journal only ever holds the current pass.
async fn run_passes(
    sniffer: &mut Sniffer<VirtualRadio>,
    settings: &ScanSettings,
    count: u32,
) -> anyhow::Result<()> {
    for pass in 1..=count {
        sniffer.driver_mut().clear_journal();
        let report = sniffer
            .run(settings)
            .await
            .with_context(|| format!("Scan pass {pass} failed"))?;
        info!(
            "Pass {}: {} transmits, {} channels, {:?}",
            pass, report.transmits_sent, report.channels_visited, report.elapsed
        );
    }
    Ok(())
}

fn print_json(result: &ScanResult<'_>) {
    match serde_json::to_string(&CollectedResult::from_result(result)) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!("Failed to encode result: {}", e),
    }
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Settings::default().save(path)?;
    info!("Wrote default settings to {}", path.display());
    Ok(())
}
