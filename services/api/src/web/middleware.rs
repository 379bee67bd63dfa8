//! services/api/src/web/middleware.rs
//!
//! Chat-session middleware for the chat routes.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error};
use uuid::Uuid;

use crate::web::state::ChatSessionId;

/// The cookie that scopes a conversation.
pub const SESSION_COOKIE: &str = "mindmate_session";

/// Reads the chat session id from the `SESSION_COOKIE` cookie.
pub fn session_id_from_headers(headers: &axum::http::HeaderMap) -> Option<ChatSessionId> {
    let prefix = format!("{}=", SESSION_COOKIE);
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix(prefix.as_str()))
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .map(ChatSessionId)
}

/// Middleware that resolves the chat session id from the session cookie.
///
/// If the cookie is missing or malformed a new id is issued and set on the response.
/// The id is inserted into request extensions for handlers to use.
pub async fn chat_session(mut req: Request, next: Next) -> Response {
    // 1. Reuse the caller's session id if it has one
    let (session_id, issued) = match session_id_from_headers(req.headers()) {
        Some(id) => (id, false),
        None => (ChatSessionId(Uuid::new_v4()), true),
    };

    // 2. Insert the session id into request extensions
    req.extensions_mut().insert(session_id);

    // 3. Continue to the handler
    let mut response = next.run(req).await;

    // 4. Hand newly issued ids back to the browser
    if issued {
        debug!("Issued chat session {}", session_id.0);
        let cookie = format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, session_id.0);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => error!("Failed to build session cookie: {:?}", e),
        }
    }

    response
}
