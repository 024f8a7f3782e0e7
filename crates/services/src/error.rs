//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{EntryError, QuestionError, QuestionId, UsernameError};
use storage::sqlite::SqliteInitError;

/// Errors emitted by `LeaderboardService`.
///
/// Storage failures are never surfaced here: reads fall back to an empty board
/// and failed writes are logged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LeaderboardError {
    #[error("invalid score submission: {0}")]
    InvalidSubmission(#[from] EntryError),
}

/// Errors emitted by `ProfileService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileError {
    #[error(transparent)]
    Username(#[from] UsernameError),
}

/// Errors emitted while loading a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),
    #[error("question bank contains no questions")]
    Empty,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
