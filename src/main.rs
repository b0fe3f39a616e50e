use anyhow::Context;
use clap::Parser;
use event_maps::domain::model::RunReport;
use event_maps::utils::error::MapError;
use event_maps::utils::logger::{self, LogFormat};
use event_maps::{AppConfig, BatchRunner, CliConfig, SqliteEventStore, StaticMapClient};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let log_format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(log_format, cli.verbose);

    tracing::info!("Starting event-maps");

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = run(&config).await {
        exit_with(e);
    }

    Ok(())
}

async fn run(config: &AppConfig) -> Result<(), MapError> {
    let fetcher = StaticMapClient::new(config.maps.clone())?;
    let store = SqliteEventStore::open(&config.database).await?;
    let runner = BatchRunner::new(store.clone(), fetcher, config.output_dir.clone());

    if config.dry_run {
        tracing::info!("DRY RUN - no maps will be fetched");
        let centers = runner.preview().await?;
        tracing::info!("Resolved {} centers", centers.len());
        store.close().await;
        return Ok(());
    }

    let report = runner.run(config.force).await?;
    store.close().await;

    // A lost report does not turn a finished batch into a failure.
    if let Some(path) = &config.report {
        match write_report(&report, path).await {
            Ok(()) => tracing::info!("Report written to {}", path.display()),
            Err(e) => tracing::warn!("{:#}", e),
        }
    }

    Ok(())
}

async fn write_report(report: &RunReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("serializing run report")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("writing run report to {}", path.display()))?;
    Ok(())
}

fn exit_with(e: MapError) -> ! {
    tracing::error!("{} (severity: {:?})", e, e.severity());
    tracing::error!("Suggestion: {}", e.recovery_suggestion());
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e {
        MapError::DataAccessError(_) => 3,
        _ => 1,
    };
    std::process::exit(exit_code);
}
