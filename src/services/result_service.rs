use tracing::info;

use crate::{
    dao::models::{NewResultRecord, ResultRecordEntity},
    error::ServiceError,
    state::SharedState,
};

/// Validate and persist one finished session's tally.
///
/// This is the single write path behind both the direct `/submit-quiz`
/// endpoint and the GraphQL `saveResult` mutation, so the two produce
/// identical validation behavior and identical stored records.
pub async fn submit_result(
    state: &SharedState,
    username: Option<String>,
    score: Option<i32>,
    total_questions: Option<i32>,
) -> Result<ResultRecordEntity, ServiceError> {
    let submission = validate_submission(username, score, total_questions)?;

    let store = state.require_result_store().await?;
    let record = store.insert_result(submission).await?;

    info!(
        id = %record.id,
        username = %record.username,
        score = record.score,
        total = record.total_questions,
        "stored quiz result"
    );

    Ok(record)
}

/// All stored results, ordered by score descending (ties keep insertion order).
pub async fn list_results(state: &SharedState) -> Result<Vec<ResultRecordEntity>, ServiceError> {
    let store = state.require_result_store().await?;
    Ok(store.list_results().await?)
}

/// Check the submission fields the way both write paths require them.
///
/// A score of zero is present and valid; only an absent or negative score
/// is rejected.
pub fn validate_submission(
    username: Option<String>,
    score: Option<i32>,
    total_questions: Option<i32>,
) -> Result<NewResultRecord, ServiceError> {
    let username = username
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("username is required".into()))?;

    let score =
        score.ok_or_else(|| ServiceError::InvalidInput("score is required".into()))?;
    if score < 0 {
        return Err(ServiceError::InvalidInput(
            "score must not be negative".into(),
        ));
    }

    let total_questions = total_questions
        .ok_or_else(|| ServiceError::InvalidInput("totalQuestions is required".into()))?;
    if total_questions <= 0 {
        return Err(ServiceError::InvalidInput(
            "totalQuestions must be positive".into(),
        ));
    }

    Ok(NewResultRecord {
        username,
        score,
        total_questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_complete_submission() {
        let record = validate_submission(Some("Alice".into()), Some(7), Some(10)).unwrap();
        assert_eq!(record.username, "Alice");
        assert_eq!(record.score, 7);
        assert_eq!(record.total_questions, 10);
    }

    #[test]
    fn zero_score_is_present_not_missing() {
        let record = validate_submission(Some("Dana".into()), Some(0), Some(10)).unwrap();
        assert_eq!(record.score, 0);
    }

    #[test]
    fn rejects_missing_or_blank_username() {
        assert!(matches!(
            validate_submission(None, Some(5), Some(10)),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_submission(Some("   ".into()), Some(5), Some(10)),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_missing_or_negative_score() {
        assert!(matches!(
            validate_submission(Some("Carl".into()), None, Some(10)),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_submission(Some("Carl".into()), Some(-1), Some(10)),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_missing_or_nonpositive_total() {
        assert!(matches!(
            validate_submission(Some("Erin".into()), Some(5), None),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_submission(Some("Erin".into()), Some(5), Some(0)),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn username_is_trimmed_before_storage() {
        let record = validate_submission(Some("  Alice  ".into()), Some(3), Some(10)).unwrap();
        assert_eq!(record.username, "Alice");
    }
}
