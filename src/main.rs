use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use candle_core::Device;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use agro_advisor::advisory::client::GeminiClient;
use agro_advisor::config::{Cli, Config};
use agro_advisor::inference::crop::CropClassifier;
use agro_advisor::inference::disease::DiseaseClassifier;
use agro_advisor::server::routes::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "agro_advisor=debug,tower_http=debug"
    } else {
        "agro_advisor=info,tower_http=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .init();

    info!("agro-advisor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let mut config = Config::load(&cli.config)?;
    if let Some(key) = cli.gemini_api_key {
        config.advisory.api_key = Some(key);
    }

    info!(
        crop_model = %config.models.crop_model_path.display(),
        disease_model = %config.models.disease_model_path.display(),
        image_size = config.models.image_size,
        "Configuration loaded"
    );

    // Both classifiers must load before the server accepts traffic; a
    // missing or malformed artifact is fatal here.
    let device = Device::Cpu;

    let crop_model = CropClassifier::load(
        &config.models.crop_model_path,
        &config.models.crop_labels_path,
        &device,
    )
    .context("loading crop recommendation model")?;
    info!(classes = crop_model.num_classes(), "Crop recommendation model loaded");

    let disease_model = DiseaseClassifier::load(
        &config.models.disease_model_path,
        &config.models.disease_labels_path,
        config.models.image_size,
        &device,
    )
    .context("loading plant disease model")?;
    info!(classes = disease_model.num_classes(), "Plant disease model loaded");

    let api_key = config
        .advisory
        .api_key
        .clone()
        .context("GEMINI_API_KEY is not set (flag, env var, or config file)")?;
    let advisor = GeminiClient::new(&config.advisory, api_key);

    // Build application state.
    let state = Arc::new(AppState {
        crop_model,
        disease_model,
        advisor: Arc::new(advisor),
        start_time: Instant::now(),
    });

    // Build the HTTP router.
    let app = build_router(state);

    // Start the server.
    let listen_addr = cli.listen.unwrap_or(config.server.listen);
    info!(addr = %listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
