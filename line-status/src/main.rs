use std::process::ExitCode;

use line_status::config::{AppConfig, ConfigError};
use line_status::odpt::{OdptClient, OdptError};
use line_status::preview::LinePreviewer;
use line_status::snapshot::RawSnapshot;
use line_status::store::{SnapshotStore, StoreError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Anything that stops a run before the previews are printed.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Odpt(#[from] OdptError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the previews.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("line_status=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), RunError> {
    let config = AppConfig::from_env()?;
    let store = SnapshotStore::new(config.store_config());

    let raw = if config.offline {
        info!(dir = %store.dir().display(), "offline mode, loading saved snapshot");
        RawSnapshot::load(&store)?
    } else {
        // Fails here, before any request, if no consumer key is set.
        let client = OdptClient::new(config.client_config())?;
        info!(
            operator = %config.operator,
            base_url = %config.base_url,
            "fetching snapshot"
        );
        let raw = RawSnapshot::fetch(&client).await?;
        raw.save(&store)?;
        raw
    };

    let snapshot = raw.decode();
    if let Some(observed_at) = snapshot.observed_at() {
        info!(%observed_at, "latest train observation");
    }

    let previewer = LinePreviewer::new(&snapshot.railways);
    for railway in &config.railways {
        println!();
        println!("=== {railway} PREVIEW ===");
        println!(
            "{}",
            previewer.render(railway, &snapshot.trains, &config.lang)
        );
    }

    Ok(())
}
