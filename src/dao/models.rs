//! Backend-agnostic result record shapes.

use serde::{Deserialize, Serialize};

/// Payload for a result record about to be persisted. The store assigns
/// the identifier on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewResultRecord {
    /// Name the participant submitted under.
    pub username: String,
    /// Final score; zero is a valid value.
    pub score: i32,
    /// Size of the question set the score was achieved against.
    pub total_questions: i32,
}

/// A persisted, immutable record of one submitted session's final tally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultRecordEntity {
    /// Store-assigned unique identifier.
    pub id: String,
    /// Name the participant submitted under.
    pub username: String,
    /// Final score; zero is a valid value.
    pub score: i32,
    /// Size of the question set the score was achieved against.
    pub total_questions: i32,
}
