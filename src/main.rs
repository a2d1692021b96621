use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use startup_harvester::client::RegistryClient;
use startup_harvester::config::Config;
use startup_harvester::db::Database;
use startup_harvester::errors::AppError;
use startup_harvester::runner::HarvestRunner;
use startup_harvester::storage::{PgProfileStore, ProfileStore};

/// Main entry point for the harvester.
///
/// Initializes logging, configuration and the database pool, then drives one
/// run over the configured page range. The pool is the only long-lived
/// resource; it is closed explicitly on every exit path, interrupt included.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "startup_harvester=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Store-connection failure is the only fatal startup condition.
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    let store = PgProfileStore::new(db.pool.clone());
    store
        .ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("Schema setup failed: {}", e))?;

    let client =
        RegistryClient::new(&config).map_err(|e| anyhow::anyhow!("Client setup failed: {}", e))?;

    tokio::select! {
        result = run_harvest(&client, &store, &config) => {
            if let Err(e) = result {
                tracing::error!("Harvest run failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, shutting down");
        }
    }

    db.pool.close().await;
    tracing::info!("Database connection released");
    Ok(())
}

async fn run_harvest<S: ProfileStore>(
    client: &RegistryClient,
    store: &S,
    config: &Config,
) -> Result<(), AppError> {
    let runner = HarvestRunner::new(client, store, config);
    let stats = runner.run().await;

    tracing::info!(
        "Run finished in {:.1}s: {} profiles, {} saved, {} failed, {} with CIN",
        stats.duration_secs,
        stats.total_profiles,
        stats.successful_saves,
        stats.failed_saves,
        stats.profiles_with_cin
    );

    store.write_summary(&stats).await?;

    match store.read_stats().await {
        Some(counts) => tracing::info!(
            "Store totals: {} profiles ({} successful, {} with CIN data), {} error records",
            counts.total,
            counts.successful,
            counts.with_cin,
            counts.errors
        ),
        None => tracing::warn!("Store statistics unavailable"),
    }

    Ok(())
}
