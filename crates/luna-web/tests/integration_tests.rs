//! Integration tests for the web server

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use luna_llm::{LlmError, MockProvider};
use luna_oracle::{Instruction, OracleConfig, OracleError};
use luna_web::{
    config::WebConfig,
    handlers::{create_router, AppState, HealthCheckResponse},
};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const PROMPT_PREFIX: &str = "You are Luna.\n\nQuestion: ";

/// Helper to create test application state
fn create_test_state(llm: MockProvider) -> AppState<MockProvider> {
    AppState::new(
        OracleConfig::full(),
        Instruction::new("You are Luna."),
        Arc::new(move |_config: &OracleConfig| Ok::<_, OracleError>(llm.clone())),
    )
}

fn ask_request(question: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/ask")
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(format!("question={}", question)))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (Option<String>, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (cookie, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_router(create_test_state(MockProvider::default()));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.model, "gemini-flash-lite-latest");
    assert_eq!(health.sessions, 0);
}

#[tokio::test]
async fn test_ask_renders_card() {
    let llm = MockProvider::new(
        "```json\n{\"summary\": \"A bright day\", \"love\": \"Sweet\", \"lucky_item\": \"Key\"}\n```",
    );
    let app = create_router(create_test_state(llm.clone()));

    let (cookie, body) = send(&app, ask_request("Today%3F", None)).await;

    assert!(cookie.unwrap().starts_with("luna_session="));
    assert!(body.contains("<dt>Overall fortune</dt><dd>A bright day</dd>"));
    assert!(body.contains("<dt>Love</dt><dd>Sweet</dd>"));
    // Missing keys render empty
    assert!(body.contains("<dt>Work</dt><dd></dd>"));

    let call = llm.last_call().unwrap();
    assert_eq!(call.prompt, format!("{}Today?", PROMPT_PREFIX));
    assert_eq!(call.model_id, "gemini-flash-lite-latest");
}

#[tokio::test]
async fn test_extraction_failure_shows_raw_text() {
    let llm = MockProvider::new("Sorry, <the stars> are cloudy.");
    let app = create_router(create_test_state(llm));

    let (_, body) = send(&app, ask_request("luck", None)).await;

    assert!(body.contains("No JSON object found in model response"));
    assert!(body.contains("<pre>Sorry, &lt;the stars&gt; are cloudy.</pre>"));
    assert!(!body.contains("<h2>History</h2>"));
}

#[tokio::test]
async fn test_remote_error_is_rendered() {
    let mut llm = MockProvider::default();
    llm.add_error(
        format!("{}luck", PROMPT_PREFIX),
        LlmError::Remote {
            status: 503,
            message: "overloaded".to_string(),
        },
    );
    let app = create_router(create_test_state(llm));

    let (_, body) = send(&app, ask_request("luck", None)).await;
    assert!(body.contains("Remote error (HTTP 503): overloaded"));
    assert!(!body.contains("<pre>"));
}

#[tokio::test]
async fn test_missing_credential_is_rendered() {
    let state: AppState<MockProvider> = AppState::new(
        OracleConfig::full(),
        Instruction::new("You are Luna."),
        Arc::new(|_config: &OracleConfig| {
            Err::<MockProvider, _>(OracleError::Configuration(
                "environment variable GEMINI_API_KEY is not set".to_string(),
            ))
        }),
    );
    let app = create_router(state);

    let (_, body) = send(&app, ask_request("luck", None)).await;
    assert!(body.contains("GEMINI_API_KEY is not set"));
}

#[tokio::test]
async fn test_history_is_per_session() {
    let llm = MockProvider::new(r#"{"summary": "Fine"}"#);
    let app = create_router(create_test_state(llm.clone()));

    let (alice, _) = send(&app, ask_request("alice+first", None)).await;
    let alice = alice.unwrap();
    let (_, body) = send(&app, ask_request("alice+second", Some(&alice))).await;

    assert!(body.contains("<strong>alice second</strong>"));
    assert!(body.contains("<strong>alice first</strong>"));
    assert!(body.find("alice second").unwrap() < body.find("<strong>alice first").unwrap());

    // A different browser sees none of it
    let (bob, body) = send(&app, ask_request("bob", None)).await;
    assert_ne!(bob.unwrap(), alice);
    assert!(!body.contains("alice"));

    assert_eq!(llm.call_count(), 3);
}

#[tokio::test]
async fn test_failed_question_not_in_history() {
    let mut llm = MockProvider::new(r#"{"summary": "Fine"}"#);
    llm.add_response(format!("{}bad", PROMPT_PREFIX), "no json at all");
    let app = create_router(create_test_state(llm));

    let (cookie, _) = send(&app, ask_request("good", None)).await;
    let cookie = cookie.unwrap();
    let (_, body) = send(&app, ask_request("bad", Some(&cookie))).await;

    assert!(body.contains("<strong>good</strong>"));
    assert!(!body.contains("<strong>bad</strong>"));
}

#[tokio::test]
async fn test_empty_question_warns_without_calling() {
    let llm = MockProvider::new(r#"{"summary": "Fine"}"#);
    let app = create_router(create_test_state(llm.clone()));

    let (_, body) = send(&app, ask_request("", None)).await;

    assert!(body.contains("Please enter a question."));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_index_shows_history() {
    let llm = MockProvider::new(r#"{"summary": "Calm seas"}"#);
    let app = create_router(create_test_state(llm));

    let (cookie, _) = send(&app, ask_request("voyage", None)).await;
    let cookie = cookie.unwrap();

    let request = Request::builder()
        .uri("/")
        .header(header::COOKIE, cookie.as_str())
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, request).await;

    assert!(body.contains("<strong>voyage</strong>: Calm seas"));
}

#[tokio::test]
async fn test_cookieless_visits_leave_store_empty() {
    let state = create_test_state(MockProvider::default());
    let app = create_router(state.clone());

    for _ in 0..500 {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (cookie, _) = send(&app, request).await;
        assert!(cookie.is_none());
    }

    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_failed_questions_start_no_session() {
    let llm = MockProvider::new("the stars are silent");
    let state = create_test_state(llm);
    let app = create_router(state.clone());

    let (cookie, _) = send(&app, ask_request("luck", None)).await;
    assert!(cookie.is_none());
    let (cookie, _) = send(&app, ask_request("", None)).await;
    assert!(cookie.is_none());

    assert_eq!(state.sessions.len(), 0);
}

#[tokio::test]
async fn test_session_count_is_capped() {
    let llm = MockProvider::new(r#"{"summary": "Fine"}"#);
    let mut config = WebConfig::default_test_config();
    config.max_sessions = 3;
    let state = create_test_state(llm).with_sessions(config.session_store());
    let app = create_router(state.clone());

    for _ in 0..20 {
        let (cookie, _) = send(&app, ask_request("luck", None)).await;
        assert!(cookie.is_some());
    }

    assert_eq!(state.sessions.len(), 3);
}

#[test]
fn test_web_config_from_toml() {
    let toml = r#"
        bind_address = "0.0.0.0"
        bind_port = 8080

        [oracle]
        variant = "simple"
    "#;

    let config = WebConfig::from_toml(toml).unwrap();
    assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    assert_eq!(config.oracle.model, "gemini-flash-lite-latest");
}
