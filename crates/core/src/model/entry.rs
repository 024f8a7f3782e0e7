use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{ids::EntryId, username::Username};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("total questions must be > 0")]
    ZeroTotalQuestions,

    #[error("score {score} exceeds total questions {total}")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

fn check_score(score: u32, total_questions: u32) -> Result<(), EntryError> {
    if total_questions == 0 {
        return Err(EntryError::ZeroTotalQuestions);
    }
    if score > total_questions {
        return Err(EntryError::ScoreExceedsTotal {
            score,
            total: total_questions,
        });
    }
    Ok(())
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// A finished quiz result ready to be merged into the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    username: Username,
    score: u32,
    total_questions: u32,
}

impl ScoreSubmission {
    /// # Errors
    ///
    /// Returns `EntryError` if `total_questions` is zero or `score` exceeds it.
    pub fn new(username: Username, score: u32, total_questions: u32) -> Result<Self, EntryError> {
        check_score(score, total_questions)?;
        Ok(Self {
            username,
            score,
            total_questions,
        })
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }
}

//
// ─── ENTRY ─────────────────────────────────────────────────────────────────────
//

/// A player's best recorded score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    id: EntryId,
    username: Username,
    score: u32,
    total_questions: u32,
    correct_answers: u32,
    date: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub(crate) fn from_submission(
        id: EntryId,
        submission: &ScoreSubmission,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username: submission.username.clone(),
            score: submission.score,
            total_questions: submission.total_questions,
            correct_answers: submission.score,
            date,
        }
    }

    /// Rehydrate an entry from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `EntryError` if the stored totals are inconsistent.
    pub fn from_persisted(
        id: EntryId,
        username: Username,
        score: u32,
        total_questions: u32,
        correct_answers: u32,
        date: DateTime<Utc>,
    ) -> Result<Self, EntryError> {
        check_score(score, total_questions)?;
        check_score(correct_answers, total_questions)?;
        Ok(Self {
            id,
            username,
            score,
            total_questions,
            correct_answers,
            date,
        })
    }

    /// Replace the best score, keeping id and username.
    pub(crate) fn improve(&mut self, submission: &ScoreSubmission, date: DateTime<Utc>) {
        self.score = submission.score;
        self.total_questions = submission.total_questions;
        self.correct_answers = submission.score;
        self.date = date;
    }

    #[must_use]
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Share of correct answers, rounded to a whole percent.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percent_of(self.correct_answers, self.total_questions)
    }
}

/// `part / whole * 100`, rounded half up. Zero when `whole` is zero.
#[must_use]
pub fn percent_of(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let scaled = u64::from(part) * 200 + u64::from(whole);
    u32::try_from(scaled / (u64::from(whole) * 2)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn name(raw: &str) -> Username {
        Username::parse(raw).unwrap()
    }

    #[test]
    fn submission_rejects_zero_total() {
        assert_eq!(
            ScoreSubmission::new(name("bo"), 0, 0).unwrap_err(),
            EntryError::ZeroTotalQuestions
        );
    }

    #[test]
    fn submission_rejects_score_above_total() {
        assert_eq!(
            ScoreSubmission::new(name("bo"), 6, 5).unwrap_err(),
            EntryError::ScoreExceedsTotal { score: 6, total: 5 }
        );
    }

    #[test]
    fn entry_from_submission_mirrors_correct_answers() {
        let submission = ScoreSubmission::new(name("bo"), 3, 4).unwrap();
        let entry = LeaderboardEntry::from_submission(EntryId::generate(), &submission, fixed_now());
        assert_eq!(entry.correct_answers(), 3);
        assert_eq!(entry.percentage(), 75);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(1, 8), 13);
        assert_eq!(percent_of(0, 0), 0);
    }
}
