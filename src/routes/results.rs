use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::result::{SubmitQuizRequest, SubmitQuizResponse},
    error::AppError,
    services::result_service,
    state::SharedState,
};

/// Routes handling direct result submission.
pub fn router() -> Router<SharedState> {
    Router::new().route("/submit-quiz", post(submit_quiz))
}

/// Persist a finished quiz's tally submitted directly over REST.
#[utoipa::path(
    post,
    path = "/submit-quiz",
    tag = "results",
    request_body = SubmitQuizRequest,
    responses(
        (status = 201, description = "Result saved", body = SubmitQuizResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn submit_quiz(
    State(state): State<SharedState>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<(StatusCode, Json<SubmitQuizResponse>), AppError> {
    result_service::submit_result(
        &state,
        payload.username,
        payload.score,
        payload.total_questions,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(SubmitQuizResponse::saved())))
}
