use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hipocrates::api::router::app_router;
use hipocrates::config::{self, AppConfig};
use hipocrates::core_state::CoreState;
use hipocrates::pipeline::gemini::GeminiClient;

#[tokio::main]
async fn main() -> ExitCode {
    // Credentials may live in a local .env file.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "configuration error, aborting startup");
            return ExitCode::FAILURE;
        }
    };

    let llm = Arc::new(GeminiClient::new(&cfg));
    let core = Arc::new(CoreState::new(llm, cfg.model.clone()));
    let app = app_router(core);

    let listener = match tokio::net::TcpListener::bind(cfg.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %cfg.bind_addr, "cannot bind listener");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(addr = %cfg.bind_addr, model = %cfg.model, "listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
