//! Payloads for the direct result submission endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body accepted by `POST /submit-quiz`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a validation failure (HTTP 400) by the shared submission
/// logic instead of a generic deserialization rejection. A score of zero
/// is explicitly valid and distinct from a missing score.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    /// Name the participant submits under.
    pub username: Option<String>,
    /// Final score of the finished session.
    pub score: Option<i32>,
    /// Number of questions in the set the score was achieved against.
    pub total_questions: Option<i32>,
}

/// Acknowledgment returned when a result has been stored.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitQuizResponse {
    /// Human readable confirmation.
    pub message: String,
}

impl SubmitQuizResponse {
    /// Standard acknowledgment body.
    pub fn saved() -> Self {
        Self {
            message: "result saved successfully".to_string(),
        }
    }
}
