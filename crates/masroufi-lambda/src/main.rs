use tracing_subscriber::EnvFilter;

use masroufi_lambda::config::LambdaConfig;
use masroufi_lambda::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for the platform log sink
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = LambdaConfig::from_env();
    if config.openai.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; assistant calls will fail");
    }

    let state = AppState::from_config(config)?;
    let app = masroufi_lambda::router(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
