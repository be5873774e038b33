//! Application-level configuration loading, including the runtime question set.

use std::{env, fs, io::ErrorKind, path::PathBuf, sync::Arc};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::session::{Question, QuestionError};

/// Default location on disk where the server looks for the JSON question set.
const DEFAULT_CONFIG_PATH: &str = "config/questions.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZ_BACK_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    questions: Arc<[Question]>,
}

impl AppConfig {
    /// Load the question set from disk, falling back to the baked-in default set.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match parse_config(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        count = config.questions.len(),
                        "loaded question set from config"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse question set; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in question set"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// The loaded question set, shared with every session.
    pub fn questions(&self) -> Arc<[Question]> {
        Arc::clone(&self.questions)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            questions: default_questions(),
        }
    }
}

/// Errors raised while turning the raw config file into a question set.
#[derive(Debug, thiserror::Error)]
enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config must contain at least one question")]
    Empty,
    #[error(transparent)]
    Question(#[from] QuestionError),
}

fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    let raw: RawConfig = serde_json::from_str(contents)?;
    if raw.questions.is_empty() {
        return Err(ConfigError::Empty);
    }

    let questions = raw
        .questions
        .into_iter()
        .map(RawQuestion::into_question)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AppConfig {
        questions: questions.into(),
    })
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single question inside the configuration file.
struct RawQuestion {
    question: String,
    options: Vec<String>,
    answer: String,
}

impl RawQuestion {
    fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(self.question, self.options, self.answer)
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in question set shipped with the binary.
fn default_questions() -> Arc<[Question]> {
    let raw: &[(&str, [&str; 4], &str)] = &[
        (
            "What is the capital of France?",
            ["Berlin", "Madrid", "Paris", "Rome"],
            "Paris",
        ),
        (
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            "Mars",
        ),
        (
            "Who wrote 'To Kill a Mockingbird'?",
            ["Harper Lee", "J.K. Rowling", "Ernest Hemingway", "Mark Twain"],
            "Harper Lee",
        ),
        (
            "What is the chemical symbol for gold?",
            ["Ag", "Au", "Pb", "Fe"],
            "Au",
        ),
        (
            "How many continents are there on Earth?",
            ["5", "6", "7", "8"],
            "7",
        ),
        (
            "Who developed the theory of relativity?",
            [
                "Isaac Newton",
                "Nikola Tesla",
                "Albert Einstein",
                "Galileo Galilei",
            ],
            "Albert Einstein",
        ),
        (
            "Which gas do plants absorb from the atmosphere?",
            ["Oxygen", "Nitrogen", "Carbon Dioxide", "Hydrogen"],
            "Carbon Dioxide",
        ),
        (
            "What is the largest ocean on Earth?",
            [
                "Atlantic Ocean",
                "Indian Ocean",
                "Arctic Ocean",
                "Pacific Ocean",
            ],
            "Pacific Ocean",
        ),
        (
            "What is the main ingredient in guacamole?",
            ["Tomato", "Avocado", "Cucumber", "Onion"],
            "Avocado",
        ),
        (
            "Which element has the atomic number 1?",
            ["Oxygen", "Hydrogen", "Helium", "Nitrogen"],
            "Hydrogen",
        ),
    ];

    raw.iter()
        .filter_map(|(text, options, answer)| {
            Question::new(
                *text,
                options.iter().map(|option| option.to_string()).collect(),
                *answer,
            )
            .inspect_err(|err| warn!(error = %err, "skipping malformed built-in question"))
            .ok()
        })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_set_has_ten_valid_questions() {
        let config = AppConfig::default();
        let questions = config.questions();
        assert_eq!(questions.len(), 10);
        for question in questions.iter() {
            assert_eq!(question.options.len(), 4);
            assert!(question.options.contains(&question.correct_option));
        }
    }

    #[test]
    fn parses_a_well_formed_config() {
        let json = r#"{
            "questions": [
                {
                    "question": "2 + 2?",
                    "options": ["1", "2", "3", "4"],
                    "answer": "4"
                }
            ]
        }"#;

        let config = parse_config(json).unwrap();
        assert_eq!(config.questions().len(), 1);
        assert_eq!(config.questions()[0].correct_option, "4");
    }

    #[test]
    fn rejects_answer_outside_options() {
        let json = r#"{
            "questions": [
                {
                    "question": "2 + 2?",
                    "options": ["1", "2", "3", "4"],
                    "answer": "5"
                }
            ]
        }"#;

        assert!(matches!(
            parse_config(json),
            Err(ConfigError::Question(QuestionError::CorrectNotAnOption { .. }))
        ));
    }

    #[test]
    fn rejects_empty_question_list() {
        assert!(matches!(
            parse_config(r#"{"questions": []}"#),
            Err(ConfigError::Empty)
        ));
    }
}
