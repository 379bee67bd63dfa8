pub mod chat_task;
pub mod journal_task;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod trend_task;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use rest::{
    chat_history_handler, end_chat_session_handler, mood_trend_handler, post_chat_handler,
    post_journal_handler, recent_journal_handler, ApiDoc,
};
pub use state::AppState;

/// Builds the complete application router: chat, journal and trend routes,
/// the static chart directory, and the Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Chat routes are scoped by the session cookie
    let chat_routes = Router::new()
        .route("/chat", post(post_chat_handler))
        .route("/chat/history", get(chat_history_handler))
        .route("/chat/session", delete(end_chat_session_handler))
        .layer(axum_middleware::from_fn(middleware::chat_session));

    let journal_routes = Router::new()
        .route("/journal", post(post_journal_handler))
        .route("/journal/recent", get(recent_journal_handler))
        .route("/mood/trend", get(mood_trend_handler));

    let static_dir = app_state.config.static_dir.clone();
    let api_router = Router::new()
        .merge(chat_routes)
        .merge(journal_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
