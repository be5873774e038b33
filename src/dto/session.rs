//! Session request payloads and the client-facing session projection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::validation::validate_participant_name,
    state::session::{QuizSession, SessionPhase},
};

/// Payload used to start a session (and to restart one).
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct StartSessionRequest {
    /// Participant name; must be non-empty once trimmed.
    #[validate(custom(function = validate_participant_name))]
    pub name: String,
}

/// Payload recording an answer for the current question.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectOptionRequest {
    /// The chosen option; must be one of the current question's options.
    pub option: String,
}

/// Lifecycle phase exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhaseDto {
    /// Session created but not started.
    NotStarted,
    /// Participant is answering questions.
    InProgress,
    /// Score is final; the session can be submitted.
    Finished,
}

impl From<SessionPhase> for SessionPhaseDto {
    fn from(value: SessionPhase) -> Self {
        match value {
            SessionPhase::NotStarted => SessionPhaseDto::NotStarted,
            SessionPhase::InProgress => SessionPhaseDto::InProgress,
            SessionPhase::Finished => SessionPhaseDto::Finished,
        }
    }
}

/// The current question as shown to the participant.
///
/// Deliberately omits the correct option so a client can never learn the
/// answer key from the wire.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionView {
    /// Question text.
    pub text: String,
    /// Ordered answer options.
    pub options: Vec<String>,
    /// Option recorded so far for this question, if any.
    pub selected: Option<String>,
}

/// Projection of a hosted session returned by every session route.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    /// Session identifier.
    pub id: Uuid,
    /// Lifecycle phase.
    pub phase: SessionPhaseDto,
    /// Name the session was started with.
    pub participant_name: String,
    /// Index of the current question.
    pub question_index: usize,
    /// Total number of questions.
    pub question_count: usize,
    /// Current question; present only while the session is in progress.
    pub question: Option<QuestionView>,
    /// Seconds left on the countdown; present only while in progress.
    pub remaining_seconds: Option<u8>,
    /// Final score; revealed only once the session has finished.
    pub score: Option<u32>,
}

impl SessionView {
    /// Build the client-facing projection of a session.
    pub fn from_session(id: Uuid, session: &QuizSession) -> Self {
        let phase = session.phase();

        let question = (phase == SessionPhase::InProgress).then(|| {
            let current = session.current_question();
            QuestionView {
                text: current.text.clone(),
                options: current.options.clone(),
                selected: session.current_selection().map(str::to_owned),
            }
        });

        Self {
            id,
            phase: phase.into(),
            participant_name: session.participant_name().to_owned(),
            question_index: session.current_index(),
            question_count: session.question_count(),
            question,
            remaining_seconds: (phase == SessionPhase::InProgress)
                .then(|| session.remaining_seconds()),
            score: (phase == SessionPhase::Finished).then(|| session.score()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::session::Question;

    fn questions() -> Arc<[Question]> {
        vec![
            Question::new(
                "q0",
                vec!["a".into(), "b".into(), "c".into(), "d".into()],
                "a",
            )
            .unwrap(),
        ]
        .into()
    }

    #[test]
    fn view_never_exposes_the_correct_option() {
        let mut session = QuizSession::new(questions());
        session.start("Alice").unwrap();

        let view = SessionView::from_session(Uuid::new_v4(), &session);
        let body = serde_json::to_string(&view).unwrap();

        assert!(!body.contains("correct"));
        assert_eq!(view.phase, SessionPhaseDto::InProgress);
        assert!(view.question.is_some());
        assert_eq!(view.score, None);
    }

    #[test]
    fn score_is_revealed_only_when_finished() {
        let mut session = QuizSession::new(questions());
        session.start("Alice").unwrap();
        session.select_option("a").unwrap();
        session.advance().unwrap();

        let view = SessionView::from_session(Uuid::new_v4(), &session);
        assert_eq!(view.phase, SessionPhaseDto::Finished);
        assert_eq!(view.score, Some(1));
        assert!(view.question.is_none());
        assert!(view.remaining_seconds.is_none());
    }
}
