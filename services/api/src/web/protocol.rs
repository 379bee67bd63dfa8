//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Chat
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// `concise` or `detailed`; defaults to the server's configured style.
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
    pub emotion: String,
    pub intent: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TurnResponse {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ChatHistoryResponse {
    pub turns: Vec<TurnResponse>,
}

//=========================================================================================
// Journal
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
pub struct JournalRequest {
    pub content: String,
}

/// Either the saved entry's analysis, or a prompt when nothing was written.
#[derive(Serialize, Debug, ToSchema)]
pub struct JournalResponse {
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct EntryPreview {
    pub date: String,
    pub mood: String,
    pub preview: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct RecentEntriesResponse {
    pub entries: Vec<EntryPreview>,
}

//=========================================================================================
// Mood Trend
//=========================================================================================

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendQuery {
    /// Comma-separated sources (`chat`, `journal`). Omit for all.
    pub sources: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TrendPoint {
    pub date: String,
    pub value: i8,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TrendResponse {
    /// Path of the rendered chart; absent when there is no data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    pub points: Vec<TrendPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
