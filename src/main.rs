//! cover-sweep server entry point.
//!
//! Starts the Axum HTTP server exposing the administrative sweep trigger,
//! and optionally runs sweeps on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use cover_sweep::api;
use cover_sweep::app_state::AppState;
use cover_sweep::config::SweepConfig;
use cover_sweep::persistence::{MemoryStore, PostgresStore, SweepStore};
use cover_sweep::service::{SweepOptions, SweepRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = SweepConfig::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting cover-sweep");

    if config.sweep_secret.is_none() {
        tracing::warn!("SWEEP_SECRET is not set; admin sweep calls will be rejected");
    }

    // Build persistence layer
    let store = build_store(&config).await?;

    // Build service layer
    let sweep_runner = Arc::new(SweepRunner::new(
        store,
        SweepOptions {
            concurrency: config.sweep_concurrency,
            batch_limit: config.sweep_batch_limit,
        },
    ));

    if config.sweep_interval_secs > 0 {
        spawn_interval_sweeps(
            Arc::clone(&sweep_runner),
            Duration::from_secs(config.sweep_interval_secs),
        );
    }

    // Build application state
    let app_state = AppState {
        sweep_runner,
        sweep_secret: config.sweep_secret.as_deref().map(Arc::from),
    };

    // Build router
    let app = Router::new().merge(api::build_router());
    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects to PostgreSQL, or falls back to an in-memory store when
/// persistence is disabled.
async fn build_store(config: &SweepConfig) -> anyhow::Result<Arc<dyn SweepStore>> {
    if !config.persistence_enabled {
        tracing::warn!("persistence disabled; using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("connecting to database")?;
    let store = PostgresStore::new(pool);

    if config.database_run_migrations {
        store.migrate().await.context("running migrations")?;
        tracing::info!("migrations applied");
    }

    Ok(Arc::new(store))
}

/// Runs a sweep every `period` for the lifetime of the process.
fn spawn_interval_sweeps(runner: Arc<SweepRunner>, period: Duration) {
    tracing::info!(period_secs = period.as_secs(), "interval sweeps enabled");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(err) = runner.run_sweep(chrono::Utc::now()).await {
                tracing::error!(error = %err, "interval sweep aborted");
            }
        }
    });
}
