use std::collections::HashSet;

use quiz_core::model::{Question, QuestionDraft};

use crate::error::QuestionBankError;

/// Parse a JSON array of questions and validate each one.
///
/// # Errors
///
/// Returns `QuestionBankError` if the JSON is malformed, any question is
/// invalid, two questions share an id, or the bank is empty.
pub fn parse_question_bank(raw: &str) -> Result<Vec<Question>, QuestionBankError> {
    let drafts: Vec<QuestionDraft> = serde_json::from_str(raw)?;
    if drafts.is_empty() {
        return Err(QuestionBankError::Empty);
    }

    let mut seen = HashSet::with_capacity(drafts.len());
    let mut questions = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let question = draft.validate()?;
        if !seen.insert(question.id()) {
            return Err(QuestionBankError::DuplicateId(question.id()));
        }
        questions.push(question);
    }
    Ok(questions)
}
