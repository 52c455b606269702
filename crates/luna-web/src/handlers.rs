//! HTTP request handlers for the web server.
//!
//! Implements the question page, the form endpoint and the health check
//! using axum.

use crate::page::{self, Outcome};
use crate::session::{session_cookie, session_id_from_headers, SessionStore};
use axum::{
    extract::{Form, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use luna_domain::{GenerationClient, Question};
use luna_llm::LlmError;
use luna_oracle::{Instruction, Oracle, OracleConfig, OracleError, Reading};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Builds a generation client for a request. Runs on the blocking pool.
pub type Connector<G> = Arc<dyn Fn(&OracleConfig) -> Result<G, OracleError> + Send + Sync>;

/// Shared application state
pub struct AppState<G> {
    /// Oracle settings
    pub config: Arc<OracleConfig>,
    /// Instruction loaded at startup
    pub instruction: Arc<Instruction>,
    /// Client factory
    pub connector: Connector<G>,
    /// Per-browser sessions
    pub sessions: Arc<SessionStore>,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            instruction: Arc::clone(&self.instruction),
            connector: Arc::clone(&self.connector),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<G> AppState<G> {
    /// Create state with an empty session store
    pub fn new(config: OracleConfig, instruction: Instruction, connector: Connector<G>) -> Self {
        Self {
            config: Arc::new(config),
            instruction: Arc::new(instruction),
            connector,
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Replace the session store
    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = Arc::new(sessions);
        self
    }
}

/// Question form
#[derive(Debug, Deserialize)]
pub struct AskForm {
    /// The question text
    #[serde(default)]
    pub question: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Configured model
    pub model: String,
    /// Number of live sessions
    pub sessions: usize,
}

fn page_response(session: Option<Uuid>, body: String) -> Response {
    match session {
        Some(id) => ([(header::SET_COOKIE, session_cookie(id))], Html(body)).into_response(),
        None => Html(body).into_response(),
    }
}

/// GET / - Question form and this session's history
async fn index<G>(State(state): State<AppState<G>>, headers: HeaderMap) -> Response {
    let session = state.sessions.lookup(session_id_from_headers(&headers));
    let history = state.sessions.history(session);
    page_response(session, page::render(state.config.fields(), &history, None))
}

/// POST /ask - Ask a question and render the outcome
async fn ask<G>(
    State(state): State<AppState<G>>,
    headers: HeaderMap,
    Form(form): Form<AskForm>,
) -> Response
where
    G: GenerationClient<Error = LlmError> + 'static,
{
    let mut session = state.sessions.lookup(session_id_from_headers(&headers));

    let outcome = match Question::new(form.question) {
        Err(_) => Outcome::Warning("Please enter a question.".to_string()),
        Ok(question) => match consult(&state, question).await {
            Ok(reading) => {
                session = Some(state.sessions.record(
                    session,
                    reading.question.clone(),
                    reading.record.clone(),
                ));
                Outcome::Reading(reading)
            }
            Err(e) => Outcome::Failure {
                message: e.to_string(),
                raw: e.raw_response().map(str::to_string),
            },
        },
    };

    let history = state.sessions.history(session);
    page_response(
        session,
        page::render(state.config.fields(), &history, Some(&outcome)),
    )
}

/// Run one question through a fresh oracle on the blocking pool
async fn consult<G>(state: &AppState<G>, question: Question) -> Result<Reading, OracleError>
where
    G: GenerationClient<Error = LlmError> + 'static,
{
    let connector = Arc::clone(&state.connector);
    let config = Arc::clone(&state.config);
    let instruction = Arc::clone(&state.instruction);

    let task = tokio::task::spawn_blocking(move || {
        let client = connector(&config)?;
        let oracle = Oracle::new(client, (*config).clone(), (*instruction).clone());
        oracle.ask(question.as_str())
    });

    match task.await {
        Ok(Ok(reading)) => {
            info!(keys = reading.record.len(), "Reading served");
            Ok(reading)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Question failed");
            Err(e)
        }
        Err(join_error) => {
            error!(error = %join_error, "Oracle task did not complete");
            Err(OracleError::Remote(LlmError::Other(
                "The request could not be completed".to_string(),
            )))
        }
    }
}

/// GET /health - Liveness check
async fn health_check<G>(State(state): State<AppState<G>>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        model: state.config.model.clone(),
        sessions: state.sessions.len(),
    })
}

/// Create the axum router with all routes
pub fn create_router<G>(state: AppState<G>) -> AxumRouter
where
    G: GenerationClient<Error = LlmError> + 'static,
{
    AxumRouter::new()
        .route("/", get(index::<G>))
        .route("/ask", post(ask::<G>))
        .route("/health", get(health_check::<G>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use luna_llm::MockProvider;
    use tower::ServiceExt; // for oneshot

    fn create_test_state(llm: MockProvider) -> AppState<MockProvider> {
        AppState::new(
            OracleConfig::simple(),
            Instruction::new("You are Luna."),
            Arc::new(move |_config: &OracleConfig| Ok::<_, OracleError>(llm.clone())),
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state(MockProvider::default()));

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_without_cookie_starts_no_session() {
        let state = create_test_state(MockProvider::default());
        let app = create_router(state.clone());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_successful_ask_sets_cookie() {
        let state = create_test_state(MockProvider::new(r#"{"summary": "x"}"#));
        let app = create_router(state.clone());

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("question=luck"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cookie.to_str().unwrap().starts_with("luna_session="));
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_question_makes_no_call() {
        let llm = MockProvider::new(r#"{"summary": "x"}"#);
        let app = create_router(create_test_state(llm.clone()));

        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("question=+++"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(llm.call_count(), 0);
    }
}
