use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("invalid recorded answer: {0}")]
    InvalidRecorded(i64),
}

/// How a single question was resolved.
///
/// Serialized as the option index, or `-1` for a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Answer {
    /// The player picked the option at this index.
    Selected(usize),
    /// The countdown ran out before the player answered.
    TimedOut,
}

impl Answer {
    const TIMEOUT_MARKER: i64 = -1;

    /// Index of the selected option, if any.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Answer::Selected(index) => Some(index),
            Answer::TimedOut => None,
        }
    }

    #[must_use]
    pub fn is_timeout(self) -> bool {
        matches!(self, Answer::TimedOut)
    }
}

impl From<Answer> for i64 {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Selected(index) => i64::try_from(index).unwrap_or(i64::MAX),
            Answer::TimedOut => Answer::TIMEOUT_MARKER,
        }
    }
}

impl TryFrom<i64> for Answer {
    type Error = AnswerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == Self::TIMEOUT_MARKER {
            return Ok(Answer::TimedOut);
        }
        usize::try_from(value)
            .map(Answer::Selected)
            .map_err(|_| AnswerError::InvalidRecorded(value))
    }
}
