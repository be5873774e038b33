use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::result::SubmitQuizResponse,
    dto::session::{SelectOptionRequest, SessionView, StartSessionRequest},
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Routes driving the hosted quiz session flow.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(start_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/select", post(select_option))
        .route("/sessions/{id}/advance", post(advance_session))
        .route("/sessions/{id}/back", post(go_back))
        .route("/sessions/{id}/restart", post(restart_session))
        .route("/sessions/{id}/submit", post(submit_session))
}

/// Start a new quiz session for the named participant.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "sessions",
    request_body = StartSessionRequest,
    responses(
        (status = 200, description = "Session started", body = SessionView),
        (status = 400, description = "Name missing or empty")
    )
)]
pub async fn start_session(
    State(state): State<SharedState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionView>, AppError> {
    payload.validate()?;
    let view = session_service::start_session(&state, payload).await?;
    Ok(Json(view))
}

/// Current state of a session (question, countdown, progress).
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = session_service::get_session(&state, id).await?;
    Ok(Json(view))
}

/// Record an answer for the current question.
#[utoipa::path(
    post,
    path = "/sessions/{id}/select",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = SelectOptionRequest,
    responses(
        (status = 200, description = "Selection recorded", body = SessionView),
        (status = 400, description = "Option is not part of the current question"),
        (status = 409, description = "Session is not in progress")
    )
)]
pub async fn select_option(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectOptionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = session_service::select_option(&state, id, payload).await?;
    Ok(Json(view))
}

/// Move past the current question, scoring it.
#[utoipa::path(
    post,
    path = "/sessions/{id}/advance",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session advanced or finished", body = SessionView),
        (status = 409, description = "Session is not in progress")
    )
)]
pub async fn advance_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = session_service::advance_session(&state, id).await?;
    Ok(Json(view))
}

/// Return to the previous question.
#[utoipa::path(
    post,
    path = "/sessions/{id}/back",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Moved back one question", body = SessionView),
        (status = 400, description = "Already on the first question"),
        (status = 409, description = "Session is not in progress")
    )
)]
pub async fn go_back(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = session_service::go_back(&state, id).await?;
    Ok(Json(view))
}

/// Discard the session and start a fresh one under the same identifier.
#[utoipa::path(
    post,
    path = "/sessions/{id}/restart",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    request_body = StartSessionRequest,
    responses(
        (status = 200, description = "Fresh session started", body = SessionView),
        (status = 400, description = "Name missing or empty"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn restart_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionView>, AppError> {
    payload.validate()?;
    let view = session_service::restart_session(&state, id, payload).await?;
    Ok(Json(view))
}

/// Submit the finished session's score to the result store.
#[utoipa::path(
    post,
    path = "/sessions/{id}/submit",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 201, description = "Result saved", body = SubmitQuizResponse),
        (status = 409, description = "Session has not finished"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn submit_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmitQuizResponse>), AppError> {
    session_service::submit_session(&state, id).await?;
    Ok((StatusCode::CREATED, Json(SubmitQuizResponse::saved())))
}
