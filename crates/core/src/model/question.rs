use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id} needs at least 2 options, got {len}")]
    TooFewOptions { id: QuestionId, len: usize },

    #[error("question {id} has an empty option at index {index}")]
    EmptyOption { id: QuestionId, index: usize },

    #[error("question {id} marks option {index} correct but only has {len} options")]
    CorrectIndexOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },

    #[error("question {id} has an empty category")]
    EmptyCategory { id: QuestionId },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in a question bank file.
///
/// Field names follow the bank's JSON layout (`question`, `correctAnswer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: u64,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub category: String,
    pub difficulty: Difficulty,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt, any option or the category is blank,
    /// if fewer than two options are given, or if `correct_index` is out of range.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = QuestionId::new(self.id);

        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id,
                len: self.options.len(),
            });
        }
        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { id, index });
        }
        if self.correct_index >= self.options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                id,
                index: self.correct_index,
                len: self.options.len(),
            });
        }
        if self.category.trim().is_empty() {
            return Err(QuestionError::EmptyCategory { id });
        }

        let explanation = self
            .explanation
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(Question {
            id,
            prompt: self.prompt,
            options: self.options,
            correct_index: self.correct_index,
            explanation,
            category: self.category,
            difficulty: self.difficulty,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question. Always has at least two options and a correct
/// index pointing at one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: Option<String>,
    category: String,
    difficulty: Difficulty,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}
