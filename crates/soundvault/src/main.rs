use gateway::{Config, GatewayApi};
use manifest::Manifest;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Startup is all-or-nothing: bad config or a bad index document
    // terminates before the listener ever binds
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let manifest = match Manifest::load(&config.manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Track index read in, holding {} keys", manifest.len());

    if let Err(e) = GatewayApi::new(config, manifest).serve().await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
