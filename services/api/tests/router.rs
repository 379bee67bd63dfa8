mod common;

use api_lib::web::{self, middleware::SESSION_COOKIE};
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use common::{test_app, test_app_with};
use std::time::Duration;
use mindmate_core::reply::ReplyStrategy;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(res: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Returns the `name=value` part of the response's session cookie.
fn session_cookie(res: &Response<Body>) -> String {
    let raw = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    let pair = raw.split(';').next().unwrap().to_string();
    assert!(pair.starts_with(SESSION_COOKIE));
    pair
}

async fn app() -> (Router, common::TestApp) {
    let test_app = test_app(ReplyStrategy::Local).await;
    (web::router(test_app.state.clone()), test_app)
}

#[tokio::test]
async fn chat_issues_a_session_and_keeps_history() {
    let (router, _app) = app().await;

    let res = router
        .clone()
        .oneshot(json_request("POST", "/chat", None, json!({ "message": "hello" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);
    let json = body_json(res).await;
    assert_eq!(json["intent"], "greet");
    assert_eq!(json["reply"], "Hello! How are you feeling right now?");

    let res = router
        .clone()
        .oneshot(json_request("POST", "/chat", Some(&cookie), json!({ "message": "thanks" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(header::SET_COOKIE).is_none());

    let res = router.clone().oneshot(get("/chat/history", Some(&cookie))).await.unwrap();
    let json = body_json(res).await;
    let turns = json["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[0]["role"], "user");
    assert_eq!(turns[2]["content"], "thanks");

    let res = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/chat/session")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let res = router.oneshot(get("/chat/history", Some(&cookie))).await.unwrap();
    let json = body_json(res).await;
    assert!(json["turns"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn cookieless_chats_do_not_pile_up_sessions() {
    let app = test_app_with(ReplyStrategy::Local, |config| {
        config.session_idle = Duration::from_millis(50);
    })
    .await;
    let router = web::router(app.state.clone());

    for _ in 0..20 {
        let res = router
            .clone()
            .oneshot(json_request("POST", "/chat", None, json!({ "message": "hello" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    tokio::time::sleep(Duration::from_millis(120)).await;
    router
        .oneshot(json_request("POST", "/chat", None, json!({ "message": "hello" })))
        .await
        .unwrap();

    assert_eq!(app.state.sessions.len().await, 1);
}

#[tokio::test]
async fn unknown_reply_style_is_rejected() {
    let (router, _app) = app().await;

    let res = router
        .oneshot(json_request(
            "POST",
            "/chat",
            None,
            json!({ "message": "hello", "style": "poetic" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn journal_endpoints_save_and_list_entries() {
    let (router, _app) = app().await;

    let res = router
        .clone()
        .oneshot(json_request("POST", "/journal", None, json!({ "content": "  " })))
        .await
        .unwrap();
    let json = body_json(res).await;
    assert_eq!(json["saved"], false);
    assert_eq!(json["message"], "What's on your mind today?");
    assert!(json.get("mood").is_none());

    let long_entry = format!("I felt sad and worried {}", "x".repeat(100));
    let res = router
        .clone()
        .oneshot(json_request("POST", "/journal", None, json!({ "content": long_entry })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["saved"], true);
    assert_eq!(json["mood"], "negative");
    assert_eq!(json["polarity"], -1.0);
    assert!(json["suggestion"]
        .as_str()
        .unwrap()
        .starts_with("It might help to take a few deep breaths"));

    let res = router.oneshot(get("/journal/recent", None)).await.unwrap();
    let json = body_json(res).await;
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    let preview = entries[0]["preview"].as_str().unwrap();
    assert_eq!(preview.chars().count(), 81);
    assert!(preview.ends_with('…'));
}

#[tokio::test]
async fn trend_endpoint_serves_points_and_chart() {
    let (router, _app) = app().await;

    let res = router.clone().oneshot(get("/mood/trend", None)).await.unwrap();
    let json = body_json(res).await;
    assert!(json.get("chart").is_none());
    assert!(json["points"].as_array().unwrap().is_empty());
    assert!(json["message"].as_str().unwrap().starts_with("No mood data yet"));

    router
        .clone()
        .oneshot(json_request("POST", "/journal", None, json!({ "content": "a great day" })))
        .await
        .unwrap();

    let res = router
        .clone()
        .oneshot(get("/mood/trend?sources=journal,chat", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json["chart"], "static/mood_trend.png");
    assert_eq!(json["points"][0]["value"], 1);

    let res = router.clone().oneshot(get("/static/mood_trend.png", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = router.oneshot(get("/mood/trend?sources=dreams", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
