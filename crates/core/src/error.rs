use thiserror::Error;

use crate::config::ConfigError;
use crate::model::{AnswerError, EntryError, QuestionError, UsernameError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Username(#[from] UsernameError),
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
