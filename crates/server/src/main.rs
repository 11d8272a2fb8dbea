use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapsum_core::{
    load_config, validate_config, JobManager, LlamaCliSummarizer, OcrLlmPipeline,
    TesseractExtractor,
};

use snapsum_server::api::create_router;
use snapsum_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("SNAPSUM_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Upload dir: {:?}", config.upload.dir);
    info!("Model path: {:?}", config.llm.model_path);

    std::fs::create_dir_all(&config.upload.dir)
        .with_context(|| format!("Failed to create upload dir {:?}", config.upload.dir))?;

    if !config.llm.model_path.exists() {
        // Jobs will fail until the model appears; startup itself proceeds.
        warn!("Model file {:?} not found", config.llm.model_path);
    }

    // Assemble the pipeline and start the job worker
    let extractor = TesseractExtractor::new(config.ocr.clone());
    let summarizer = LlamaCliSummarizer::new(config.llm.clone());
    let pipeline = Arc::new(OcrLlmPipeline::new(extractor, summarizer));
    let jobs = Arc::new(JobManager::new(pipeline));
    info!("Job manager started");

    // Create app state
    let app_state = Arc::new(AppState::new(config.clone(), Arc::clone(&jobs)));

    // Create router
    let app = create_router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Let an in-flight job finish; the join blocks, so leave the runtime.
    info!("Server shutting down...");
    tokio::task::spawn_blocking(move || jobs.shutdown())
        .await
        .context("Job manager shutdown task panicked")?;
    info!("Shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
