use std::sync::Arc;

use thiserror::Error;

/// Countdown granted for every question, in seconds.
pub const QUESTION_SECONDS: u8 = 10;
/// Number of answer options every question must carry.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A single multiple-choice question, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Question text shown to the participant.
    pub text: String,
    /// Ordered answer options (exactly four, all distinct).
    pub options: Vec<String>,
    /// The option counted as correct; always one of `options`.
    pub correct_option: String,
}

/// Error raised when a question definition is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    /// The question does not carry exactly four options.
    #[error("question `{text}` must have exactly {expected} options (got {got})")]
    WrongOptionCount {
        /// Question text for diagnostics.
        text: String,
        /// Required option count.
        expected: usize,
        /// Actual option count.
        got: usize,
    },
    /// Two options share the same text.
    #[error("question `{text}` has duplicate option `{option}`")]
    DuplicateOption {
        /// Question text for diagnostics.
        text: String,
        /// The duplicated option.
        option: String,
    },
    /// The correct option is not a member of the options list.
    #[error("question `{text}` marks `{correct}` correct but it is not an option")]
    CorrectNotAnOption {
        /// Question text for diagnostics.
        text: String,
        /// The offending correct option.
        correct: String,
    },
}

impl Question {
    /// Build a question, enforcing the option-count, uniqueness, and
    /// membership invariants.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        let correct_option = correct_option.into();

        if options.len() != OPTIONS_PER_QUESTION {
            return Err(QuestionError::WrongOptionCount {
                text,
                expected: OPTIONS_PER_QUESTION,
                got: options.len(),
            });
        }

        if let Some(option) = first_duplicate(&options) {
            return Err(QuestionError::DuplicateOption {
                text,
                option: option.clone(),
            });
        }

        if !options.contains(&correct_option) {
            return Err(QuestionError::CorrectNotAnOption {
                text,
                correct: correct_option,
            });
        }

        Ok(Self {
            text,
            options,
            correct_option,
        })
    }
}

fn first_duplicate(options: &[String]) -> Option<&String> {
    options
        .iter()
        .enumerate()
        .find(|(index, option)| options[..*index].contains(option))
        .map(|(_, option)| option)
}

/// Lifecycle phases of a quiz session. Transitions are one-way; a restart
/// discards the session and creates a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Session created but no participant has started it yet.
    NotStarted,
    /// Participant is answering questions against the countdown.
    InProgress,
    /// All questions have been passed; the score is final.
    Finished,
}

/// Operations that can be rejected by the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOp {
    /// [`QuizSession::start`].
    Start,
    /// [`QuizSession::select_option`].
    SelectOption,
    /// [`QuizSession::advance`].
    Advance,
    /// [`QuizSession::tick`].
    Tick,
    /// [`QuizSession::go_back`].
    GoBack,
    /// [`QuizSession::finished_summary`].
    FinishedSummary,
}

impl std::fmt::Display for SessionOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionOp::Start => "start",
            SessionOp::SelectOption => "select_option",
            SessionOp::Advance => "advance",
            SessionOp::Tick => "tick",
            SessionOp::GoBack => "go_back",
            SessionOp::FinishedSummary => "finished_summary",
        };
        f.write_str(name)
    }
}

/// Error returned when a session operation cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The participant name is empty after trimming.
    #[error("name required")]
    NameRequired,
    /// The operation is not valid in the session's current phase.
    #[error("{op} is not valid while the session is {phase:?}")]
    InvalidPhase {
        /// Operation that was attempted.
        op: SessionOp,
        /// Phase the session was in.
        phase: SessionPhase,
    },
    /// The selected option is not part of the current question.
    #[error("option `{option}` is not one of the current question's options")]
    UnknownOption {
        /// The rejected option text.
        option: String,
    },
    /// `go_back` was called while already on the first question.
    #[error("cannot go back from the first question")]
    AtFirstQuestion,
}

/// Outcome of a (possibly forced) advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved on to the question at this index, countdown reset.
    NextQuestion {
        /// Index of the question now current.
        index: usize,
    },
    /// The last question was passed; the session is finished.
    Finished,
}

/// Outcome of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown decremented, this many seconds remain.
    Counting {
        /// Seconds left for the current question.
        remaining: u8,
    },
    /// The countdown expired and the session advanced as-is.
    ForcedAdvance(AdvanceOutcome),
}

/// Final tally of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Name the participant started the session with.
    pub participant_name: String,
    /// Number of questions answered correctly.
    pub score: u32,
    /// Total number of questions in the set.
    pub question_count: usize,
}

/// One participant's attempt at the fixed question set.
///
/// The score only ever changes inside [`advance`](Self::advance) (user
/// driven or forced by the countdown). Each question is worth at most one
/// point, counted the first time the session moves past it with a matching
/// selection. Revisiting an already-counted question via
/// [`go_back`](Self::go_back) never recomputes the score, and leaving it
/// again never re-opens it for scoring.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Arc<[Question]>,
    phase: SessionPhase,
    participant_name: String,
    current_index: usize,
    selections: Vec<Option<String>>,
    scored: Vec<bool>,
    score: u32,
    remaining_seconds: u8,
}

impl QuizSession {
    /// Create a session over the given question set, in the not-started phase.
    pub fn new(questions: Arc<[Question]>) -> Self {
        let selections = vec![None; questions.len()];
        let scored = vec![false; questions.len()];
        Self {
            questions,
            phase: SessionPhase::NotStarted,
            participant_name: String::new(),
            current_index: 0,
            selections,
            scored,
            score: 0,
            remaining_seconds: QUESTION_SECONDS,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Name supplied at start; empty until the session starts.
    pub fn participant_name(&self) -> &str {
        &self.participant_name
    }

    /// Index of the question currently shown.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Total number of questions in the set.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The question at the current index.
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    /// Option recorded for the current question, if any.
    pub fn current_selection(&self) -> Option<&str> {
        self.selections[self.current_index].as_deref()
    }

    /// Running score. Only meaningful to external callers once finished.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds left on the current question's countdown.
    pub fn remaining_seconds(&self) -> u8 {
        self.remaining_seconds
    }

    /// Begin the session for the named participant.
    ///
    /// Rejects an empty (after trimming) name and leaves the session in
    /// the not-started phase in that case.
    pub fn start(&mut self, name: &str) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::NotStarted, SessionOp::Start)?;

        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SessionError::NameRequired);
        }

        self.participant_name = trimmed.to_owned();
        self.phase = SessionPhase::InProgress;
        self.current_index = 0;
        self.score = 0;
        self.remaining_seconds = QUESTION_SECONDS;
        self.selections.fill(None);
        self.scored.fill(false);
        Ok(())
    }

    /// Record a choice for the current question, overwriting any prior one.
    ///
    /// The option must be a member of the current question's option list;
    /// this is enforced here because the session is driven over the network
    /// rather than by a trusted in-process UI. The score is untouched until
    /// the session advances past the question.
    pub fn select_option(&mut self, option: &str) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::InProgress, SessionOp::SelectOption)?;

        if !self
            .current_question()
            .options
            .iter()
            .any(|candidate| candidate == option)
        {
            return Err(SessionError::UnknownOption {
                option: option.to_owned(),
            });
        }

        self.selections[self.current_index] = Some(option.to_owned());
        Ok(())
    }

    /// Leave the current question, scoring it, and move forward or finish.
    ///
    /// This is the only operation that changes the score or the current
    /// index while the session is running.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        self.require_phase(SessionPhase::InProgress, SessionOp::Advance)?;
        Ok(self.advance_scored())
    }

    /// Count down one second, forcing an advance when the time is up.
    ///
    /// When the countdown is already at one second the tick acts as if the
    /// participant ran out of time: the question is left with whatever
    /// selection it has, evaluated by the same rules as a user advance.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.require_phase(SessionPhase::InProgress, SessionOp::Tick)?;

        if self.remaining_seconds <= 1 {
            return Ok(TickOutcome::ForcedAdvance(self.advance_scored()));
        }

        self.remaining_seconds -= 1;
        Ok(TickOutcome::Counting {
            remaining: self.remaining_seconds,
        })
    }

    /// Return to the previous question, resetting the countdown.
    ///
    /// Deliberately does not undo or recompute the score: score changes are
    /// one-directional and tied to forward advances only, so revisiting and
    /// changing an answer has no effect on points already counted.
    pub fn go_back(&mut self) -> Result<usize, SessionError> {
        self.require_phase(SessionPhase::InProgress, SessionOp::GoBack)?;

        if self.current_index == 0 {
            return Err(SessionError::AtFirstQuestion);
        }

        self.current_index -= 1;
        self.remaining_seconds = QUESTION_SECONDS;
        Ok(self.current_index)
    }

    /// Final tally; only available once the session has finished.
    pub fn finished_summary(&self) -> Result<SessionSummary, SessionError> {
        self.require_phase(SessionPhase::Finished, SessionOp::FinishedSummary)?;

        Ok(SessionSummary {
            participant_name: self.participant_name.clone(),
            score: self.score,
            question_count: self.questions.len(),
        })
    }

    fn require_phase(&self, expected: SessionPhase, op: SessionOp) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidPhase {
                op,
                phase: self.phase,
            })
        }
    }

    fn advance_scored(&mut self) -> AdvanceOutcome {
        let index = self.current_index;
        // A question is evaluated only on the first advance past it; after
        // a go_back the re-advance must not award the point again.
        if !self.scored[index] {
            self.scored[index] = true;
            let question = &self.questions[index];
            if self.selections[index].as_deref() == Some(question.correct_option.as_str()) {
                self.score += 1;
            }
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.remaining_seconds = QUESTION_SECONDS;
            AdvanceOutcome::NextQuestion {
                index: self.current_index,
            }
        } else {
            self.phase = SessionPhase::Finished;
            AdvanceOutcome::Finished
        }
    }
}
