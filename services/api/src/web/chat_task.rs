//! services/api/src/web/chat_task.rs
//!
//! Handles a single chat turn: classify, log the mood signal, reply, and
//! weave in the session's memory hint.

use crate::web::state::AppState;
use mindmate_core::{
    classifier::{analyze, analyze_chat_message},
    domain::{local_now, ClassificationContext, ReplyStyle, SignalSource},
    ports::PortResult,
    reply::EMPTY_INPUT_PROMPT,
    session::{compose_reply, ChatSession},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::info;

/// The outcome of one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub reply: String,
    pub context: ClassificationContext,
    /// Whether the turn was recorded. Blank messages are not.
    pub recorded: bool,
}

/// Runs one chat turn against `session_lock`.
///
/// The session stays locked for the whole turn, so turns within one session are
/// handled strictly one after another.
pub async fn chat_process(
    app_state: Arc<AppState>,
    session_lock: Arc<Mutex<ChatSession>>,
    message: &str,
    style: ReplyStyle,
) -> PortResult<ChatOutcome> {
    if message.trim().is_empty() {
        return Ok(ChatOutcome {
            reply: EMPTY_INPUT_PROMPT.to_string(),
            context: ClassificationContext::default(),
            recorded: false,
        });
    }

    let start_time = Instant::now();
    let context = analyze_chat_message(message);
    info!("Chat turn classified: intent={}, emotion={}", context.intent, context.emotion);

    let mut session = session_lock.lock().await;

    app_state
        .db
        .create_mood_signal(
            local_now(),
            SignalSource::Chat,
            message,
            context.emotion,
            context.emotion.signal_polarity(),
        )
        .await?;

    session.observe(message, &context);
    let history = session.history.clone();
    session.push_user(message);

    // The canned fallback reads the raw classification, so the "not angry"
    // override only affects the reported emotion and intent.
    let reply_context = analyze(message);
    let base = app_state
        .replies
        .reply(message, &reply_context, &history, style)
        .await;

    let hint = session.take_memory_hint(context.emotion, app_state.config.memory_hints);
    let reply = compose_reply(hint.as_deref(), &base);
    session.push_assistant(reply.clone());

    info!("Chat turn answered in {:?}", start_time.elapsed());
    Ok(ChatOutcome {
        reply,
        context,
        recorded: true,
    })
}
