use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{ActionOutcome, BookAction, LoadStateKind};
use crate::services::providers::LibrarySession;
use crate::services::recommendations::{CardActions, LoadOptions};
use crate::view::ContainerSet;

use super::AppState;

/// Response header naming the state the widget fragment was rendered in
pub const LOAD_STATE_HEADER: &str = "x-load-state";

const WIDGET_CONTAINER: &str = "recommendations";

// Request/Response types

/// Body of `POST /sessions/:session_id/recent`
///
/// `isbns` is taken as loosely as the browser sent it: anything that is not an
/// array of strings (including a missing field) records nothing.
#[derive(Debug, Deserialize)]
pub struct RecordViewedRequest {
    #[serde(default)]
    pub isbns: Value,
}

impl RecordViewedRequest {
    fn isbns(self) -> Option<Vec<String>> {
        serde_json::from_value(self.isbns).ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentItemsResponse {
    pub isbns: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: BookAction,
    pub isbn: String,
}

/// Reader's library session, taken from the request's `Cookie` headers
fn session_from_headers(state: &AppState, headers: &HeaderMap) -> LibrarySession {
    state.library_session(
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok()),
    )
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get a session's recently viewed ISBNs
pub async fn get_recent(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<RecentItemsResponse> {
    let isbns = state.tracker_for(&session_id).get_recent_items().await;
    Json(RecentItemsResponse { isbns })
}

/// Record viewed ISBNs for a session
pub async fn record_recent(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecordViewedRequest>,
) -> Json<RecentItemsResponse> {
    let tracker = state.tracker_for(&session_id);

    match request.isbns() {
        Some(isbns) => {
            tracing::info!(
                request_id = %request_id,
                session_id = %session_id,
                count = isbns.len(),
                "Recording viewed books"
            );
            tracker.record_viewed(&isbns).await;
        }
        None => tracing::debug!(
            request_id = %request_id,
            session_id = %session_id,
            "Ignoring record request without an ISBN list"
        ),
    }

    Json(RecentItemsResponse {
        isbns: tracker.get_recent_items().await,
    })
}

/// Render the recommendations widget fragment for a session
///
/// Without a library session the library application answers with an
/// unauthenticated envelope and the widget renders its empty state.
pub async fn recommendations_widget(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Response {
    let library_session = session_from_headers(&state, &headers);
    let containers = Arc::new(ContainerSet::new());
    let container = containers.register(WIDGET_CONTAINER);
    let loader = state.loader_for(&session_id, &library_session, containers);

    let options = LoadOptions {
        render: state.settings.render,
        actions: None,
    };
    let state_kind = loader
        .load(WIDGET_CONTAINER, &options)
        .await
        .map_or(LoadStateKind::Loading, |outcome| outcome.state);

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        authenticated = library_session.is_authenticated(),
        state = %state_kind,
        "Recommendations widget rendered"
    );

    (
        [(LOAD_STATE_HEADER, state_kind.as_str())],
        Html(container.html()),
    )
        .into_response()
}

/// Issue or reserve a book from a recommendation card
///
/// The action is forwarded as-is. This route keeps no rendered cards, so it
/// cannot refuse Issue for an out-of-stock book; the rendered card disables
/// that control and the library application applies its own circulation
/// rules, whose refusal comes back as an unsuccessful outcome.
pub async fn perform_action(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(request): Json<ActionRequest>,
) -> AppResult<Json<ActionOutcome>> {
    let isbn = request.isbn.trim();
    if isbn.is_empty() {
        return Err(AppError::InvalidInput("ISBN cannot be empty".to_string()));
    }

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        action = %request.action,
        isbn = %isbn,
        "Processing book action"
    );

    state.tracker_for(&session_id).record_viewed(&[isbn]).await;

    let library_session = session_from_headers(&state, &headers);
    let outcome = CardActions::new(state.actions_for(&library_session))
        .trigger(request.action, isbn)
        .await?;

    Ok(Json(outcome))
}
