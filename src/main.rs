use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use invoice_extract::handlers::{create_router, AppState};
use invoice_extract::services::{ExtractionJob, GeminiProvider, ModelProvider, StagingArea, ValidationRule};
use invoice_extract::Config;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoice_extract=debug,tower_http=debug,axum::rejection=trace".into());

    let json = env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;

    tracing::info!("Starting invoice extraction service");
    tracing::info!("Max file size: {}MB", config.max_file_size_mb);
    tracing::info!("Staging directory: {}", config.staging_dir.display());

    let provider = GeminiProvider::new(&config);
    if !provider.is_configured() {
        // Not fatal at startup: every job reports it until the key is set.
        tracing::warn!("GEMINI_API_KEY is not set; extraction requests will fail");
    }

    let job = ExtractionJob::new(
        ValidationRule::server(config.max_file_size_bytes()),
        StagingArea::new(config.staging_dir.clone()),
        Arc::new(provider),
    );
    let app = create_router(AppState::new(job, config.max_file_size_mb));

    // PORT wins over SERVER_PORT for platform deployments
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.server_port);

    let addr = format!("{}:{}", config.server_host, port);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
