//! HTTP + WebSocket API for questionnaire sessions
//!
//! Endpoints:
//! - POST /session/new - Create new session
//! - GET /session/{id} - Get session status
//! - POST /session/{id}/answer - Answer the pending question
//! - POST /session/{id}/next - Retry fetching the next question
//! - GET /session/{id}/summary - Profile summary
//! - POST /session/{id}/reset - Start over
//! - WS /ws/{id} - Live updates
//! - GET /health - Health check

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::core::{JsonFileStore, QuestionGenerator, QuestionnaireEngine};
use crate::error::ApiError;
use crate::types::{NextQuestion, ProfileSummary, Progress, Question, QuestionnaireState, Stage, StepOutput};

/// One questionnaire session
pub struct Session {
    pub id: String,
    pub engine: QuestionnaireEngine,
    pub update_tx: broadcast::Sender<SessionUpdate>,
}

impl Session {
    fn new(id: String, state: &AppState) -> Self {
        let (tx, _) = broadcast::channel(100);
        let store = JsonFileStore::for_session(&state.config.state_dir, &id);
        Self {
            id,
            engine: QuestionnaireEngine::new(
                state.generator.clone(),
                Box::new(store),
                state.config.checker(),
            ),
            update_tx: tx,
        }
    }

    fn broadcast(&self) {
        let progress = self.engine.progress();
        let update = SessionUpdate {
            question_number: progress.answered,
            stage: self.engine.state().stage,
            converged: progress.converged,
            complete: progress.complete,
        };
        // No subscribers is fine
        let _ = self.update_tx.send(update);
    }
}

/// Live update message
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub question_number: u32,
    pub stage: Stage,
    pub converged: usize,
    pub complete: bool,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
    pub config: Config,
    pub generator: Arc<dyn QuestionGenerator>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    /// None when the generator was unavailable; retry with /next
    pub question: Option<Question>,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub state: QuestionnaireState,
    pub pending: Option<Question>,
    pub progress: Progress,
}

/// Answer request
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub option_index: usize,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Create the API router
pub fn create_router(config: Config, generator: Arc<dyn QuestionGenerator>) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        config,
        generator,
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/answer", post(answer))
        .route("/session/:id/next", post(next_question))
        .route("/session/:id/summary", get(get_summary))
        .route("/session/:id/reset", post(reset_session))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let session_id = Uuid::new_v4().simple().to_string();
    let mut session = Session::new(session_id.clone(), &state);

    let question = match session.engine.start() {
        Ok(NextQuestion::Ask(q)) => Some(q),
        Ok(NextQuestion::Complete) => None,
        Err(e) => {
            warn!(session = %session_id, "first question unavailable: {}", e);
            None
        }
    };
    info!(session = %session_id, "session created");

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);

    Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
        question,
    })
}

/// Make sure `id` is loaded, restoring it from disk after a restart
async fn ensure_session(state: &AppState, id: &str) -> Result<(), ApiError> {
    if state.sessions.read().await.contains_key(id) {
        return Ok(());
    }
    // Only ids we could have issued map onto files
    if Uuid::parse_str(id).is_err() {
        return Err(ApiError::SessionNotFound);
    }

    let mut session = Session::new(id.to_string(), state);
    if !session.engine.restore() {
        return Err(ApiError::SessionNotFound);
    }
    if let Err(e) = session.engine.advance() {
        warn!(session = %id, "restored without a pending question: {}", e);
    }
    info!(session = %id, "session restored from disk");

    state
        .sessions
        .write()
        .await
        .entry(id.to_string())
        .or_insert(session);
    Ok(())
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    ensure_session(&state, &id).await?;
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;

    Ok(Json(SessionStatusResponse {
        session_id: session.id.clone(),
        state: session.engine.state().clone(),
        pending: session.engine.pending().cloned(),
        progress: session.engine.progress(),
    }))
}

/// Answer the pending question
async fn answer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<StepOutput>, ApiError> {
    ensure_session(&state, &id).await?;
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    let result = session.engine.answer(req.option_index);
    // The answer may be recorded even if fetching the next question failed
    session.broadcast();

    Ok(Json(result?))
}

/// Fetch the next question again (after a generator failure)
async fn next_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NextQuestion>, ApiError> {
    ensure_session(&state, &id).await?;
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    let next = session.engine.advance()?;
    session.broadcast();
    Ok(Json(next))
}

/// Profile summary for the current weights
async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProfileSummary>, ApiError> {
    ensure_session(&state, &id).await?;
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    Ok(Json(session.engine.summary()))
}

/// Explicit restart
async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NextQuestion>, ApiError> {
    ensure_session(&state, &id).await?;
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    session.engine.reset();
    let next = session.engine.advance();
    session.broadcast();
    Ok(Json(next?))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    ensure_session(&state, &id).await?;
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Forward updates until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<SessionUpdate>) {
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            let update = match rx.recv().await {
                Ok(update) => update,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };
            let json = serde_json::to_string(&update).unwrap_or_default();
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Run the API server
pub async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let generator = Arc::new(config.question_bank()?);
    let addr = config.addr.clone();
    let router = create_router(config, generator);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Aptitude API running on {}", addr);
    info!("  POST /session/new          - Create session");
    info!("  GET  /session/:id          - Get status");
    info!("  POST /session/:id/answer   - Answer pending question");
    info!("  POST /session/:id/next     - Retry next question");
    info!("  GET  /session/:id/summary  - Profile summary");
    info!("  POST /session/:id/reset    - Start over");
    info!("  WS   /ws/:id               - Live updates");
    info!("  GET  /health               - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
