use regret_generator::client::{GeminiImageClient, VeoVideoClient};
use regret_generator::{logging, run_batch, BatchSummary, GeneratorConfig, GeneratorError, RetryPolicy};
use regret_shared::{Catalog, MediaKind};
use tracing::{error, info};

fn load_catalog(config: &GeneratorConfig) -> Result<Catalog, GeneratorError> {
    match &config.catalog_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(Catalog::from_json(&json)?)
        }
        None => Ok(Catalog::builtin()?),
    }
}

async fn run(config: GeneratorConfig) -> Result<BatchSummary, GeneratorError> {
    let catalog = load_catalog(&config)?;
    let policy = RetryPolicy::new(config.rate_limit);
    let http = reqwest::Client::new();

    info!(
        "=== Regret Roulette {:?} generator: {} scenarios into {} ===",
        config.media,
        catalog.len(),
        config.output_dir.display()
    );

    match config.media {
        MediaKind::Image => {
            let client = GeminiImageClient::new(http, &config.api_key, &config.image_model);
            run_batch(&catalog, &client, config.media, &config.output_dir, &policy).await
        }
        MediaKind::Video => {
            let client = VeoVideoClient::new(http, &config.api_key, &config.video_model);
            run_batch(&catalog, &client, config.media, &config.output_dir, &policy).await
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::setup();

    let config = match GeneratorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    match run(config).await {
        Ok(summary) => {
            info!("=== DONE ===");
            info!(
                "Generated: {} | Skipped: {} | Failed: {} (of {})",
                summary.generated,
                summary.skipped,
                summary.failed,
                summary.total()
            );
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
