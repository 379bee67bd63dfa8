//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, OllamaChatAdapter, OpenAiChatAdapter, PngChartRenderer},
    config::{Config, LlmProvider},
    error::ApiError,
    web::{self, state::SessionStore, AppState},
};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use mindmate_core::reply::ReplyStrategy;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_adapter = Arc::new(DbAdapter::connect(&config.database_url).await?);
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let replies = match &config.llm_provider {
        LlmProvider::OpenAi(settings) => {
            info!("Replies backed by OpenAI model {}", settings.model);
            ReplyStrategy::remote(
                Arc::new(OpenAiChatAdapter::from_settings(settings)),
                config.llm_timeout,
            )
        }
        LlmProvider::Ollama(settings) => {
            info!("Replies backed by Ollama model {} at {}", settings.model, settings.base_url);
            ReplyStrategy::remote(
                Arc::new(OllamaChatAdapter::new(settings, config.llm_timeout)?),
                config.llm_timeout,
            )
        }
        LlmProvider::Disabled => {
            info!("No generative provider configured; using rule-based replies only.");
            ReplyStrategy::Local
        }
    };

    let charts = Arc::new(PngChartRenderer::new(config.static_dir.clone(), "static"));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        config: config.clone(),
        replies,
        charts,
        sessions: Arc::new(SessionStore::new(config.session_idle)),
    });

    // --- 5. Create the Web Router ---
    let origin = format!("http://{}", config.bind_address)
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    let app = web::router(app_state).layer(cors);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
