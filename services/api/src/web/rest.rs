//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    chat_task::chat_process,
    journal_task::{self, JournalOutcome},
    middleware::SESSION_COOKIE,
    protocol::{
        ChatHistoryResponse, ChatRequest, ChatResponse, EntryPreview, JournalRequest,
        JournalResponse, RecentEntriesResponse, TrendPoint, TrendQuery, TrendResponse,
        TurnResponse,
    },
    state::{AppState, ChatSessionId},
    trend_task::{trend_process, TrendOutcome},
};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use mindmate_core::{
    domain::{ReplyStyle, SignalSource, TIMESTAMP_FORMAT},
    ports::PortError,
};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        post_chat_handler,
        chat_history_handler,
        end_chat_session_handler,
        post_journal_handler,
        recent_journal_handler,
        mood_trend_handler,
    ),
    components(
        schemas(
            ChatRequest,
            ChatResponse,
            TurnResponse,
            ChatHistoryResponse,
            JournalRequest,
            JournalResponse,
            EntryPreview,
            RecentEntriesResponse,
            TrendPoint,
            TrendResponse,
        )
    ),
    tags(
        (name = "MindMate API", description = "Supportive chat, mood journal and mood trend endpoints.")
    )
)]
pub struct ApiDoc;

type HandlerError = (StatusCode, String);

fn internal_error(context: &str, e: PortError) -> HandlerError {
    error!("{}: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
}

//=========================================================================================
// Chat Handlers
//=========================================================================================

/// Send a chat message and receive a supportive reply.
///
/// The conversation is scoped by the session cookie, issued on first use.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Reply generated", body = ChatResponse),
        (status = 400, description = "Unknown reply style"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn post_chat_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(session_id): Extension<ChatSessionId>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, HandlerError> {
    let style = match request.style.as_deref() {
        Some(raw) => raw
            .parse::<ReplyStyle>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e))?,
        None => app_state.config.reply_style,
    };

    let session = app_state.sessions.get_or_create(session_id).await;
    let outcome = chat_process(app_state.clone(), session, &request.message, style)
        .await
        .map_err(|e| internal_error("Failed to process chat message", e))?;

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        emotion: outcome.context.emotion.to_string(),
        intent: outcome.context.intent.to_string(),
    }))
}

/// Return the turns of the current chat session.
#[utoipa::path(
    get,
    path = "/chat/history",
    responses(
        (status = 200, description = "Turns of the current session, oldest first", body = ChatHistoryResponse)
    )
)]
pub async fn chat_history_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(session_id): Extension<ChatSessionId>,
) -> Json<ChatHistoryResponse> {
    let turns = match app_state.sessions.get(session_id).await {
        Some(session) => session
            .lock()
            .await
            .history
            .iter()
            .map(|turn| TurnResponse {
                role: turn.role.as_str().to_string(),
                content: turn.content.clone(),
            })
            .collect(),
        None => Vec::new(),
    };
    Json(ChatHistoryResponse { turns })
}

/// End the current chat session and forget its history.
#[utoipa::path(
    delete,
    path = "/chat/session",
    responses(
        (status = 204, description = "Session ended")
    )
)]
pub async fn end_chat_session_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(session_id): Extension<ChatSessionId>,
) -> impl IntoResponse {
    if app_state.sessions.end(session_id).await {
        info!("Chat session {} ended", session_id.0);
    }
    let expired = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, expired)])
}

//=========================================================================================
// Journal Handlers
//=========================================================================================

/// Save a journal entry and get its mood analysis.
#[utoipa::path(
    post,
    path = "/journal",
    request_body = JournalRequest,
    responses(
        (status = 200, description = "Entry analysed, or a prompt when it was blank", body = JournalResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn post_journal_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<JournalRequest>,
) -> Result<Json<JournalResponse>, HandlerError> {
    let outcome = journal_task::submit_entry(app_state, &request.content)
        .await
        .map_err(|e| internal_error("Failed to save journal entry", e))?;

    let response = match outcome {
        JournalOutcome::Saved { entry, suggestion } => JournalResponse {
            saved: true,
            mood: Some(entry.mood.to_string()),
            polarity: Some(entry.polarity),
            suggestion: Some(suggestion.to_string()),
            message: None,
        },
        JournalOutcome::Skipped { prompt } => JournalResponse {
            saved: false,
            mood: None,
            polarity: None,
            suggestion: None,
            message: Some(prompt.to_string()),
        },
    };
    Ok(Json(response))
}

/// List previews of the five newest journal entries.
#[utoipa::path(
    get,
    path = "/journal/recent",
    responses(
        (status = 200, description = "Newest entries first", body = RecentEntriesResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn recent_journal_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<RecentEntriesResponse>, HandlerError> {
    let entries = journal_task::recent_entries(app_state)
        .await
        .map_err(|e| internal_error("Failed to load journal entries", e))?;

    let entries = entries
        .into_iter()
        .map(|entry| EntryPreview {
            date: entry.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
            mood: entry.mood.to_string(),
            preview: journal_task::preview(&entry.content),
        })
        .collect();
    Ok(Json(RecentEntriesResponse { entries }))
}

//=========================================================================================
// Mood Trend Handler
//=========================================================================================

/// Parses the comma-separated `sources` query value. Blank means all sources.
pub fn parse_sources(raw: Option<&str>) -> Result<Vec<SignalSource>, String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<SignalSource>)
        .collect()
}

/// Render the mood trend chart for the selected sources.
#[utoipa::path(
    get,
    path = "/mood/trend",
    params(TrendQuery),
    responses(
        (status = 200, description = "Chart path and points, or a no-data message", body = TrendResponse),
        (status = 400, description = "Unknown source"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn mood_trend_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendResponse>, HandlerError> {
    let sources =
        parse_sources(query.sources.as_deref()).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let outcome = trend_process(app_state, &sources)
        .await
        .map_err(|e| internal_error("Failed to build mood trend", e))?;

    let response = match outcome {
        TrendOutcome::Chart { chart, series } => TrendResponse {
            chart: Some(chart),
            points: series
                .points()
                .map(|(at, value)| TrendPoint {
                    date: at.format(TIMESTAMP_FORMAT).to_string(),
                    value,
                })
                .collect(),
            message: None,
        },
        TrendOutcome::NoData { message } => TrendResponse {
            chart: None,
            points: Vec::new(),
            message: Some(message.to_string()),
        },
    };
    Ok(Json(response))
}
