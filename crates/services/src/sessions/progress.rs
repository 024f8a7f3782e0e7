use serde::Serialize;

use quiz_core::model::{Answer, Question, percent_of};

/// How close the countdown is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUrgency {
    /// At least half the time is left.
    Calm,
    /// Under half the time is left.
    Warning,
    /// Under a quarter of the time is left.
    Critical,
}

impl TimerUrgency {
    #[must_use]
    pub fn classify(remaining: u32, limit: u32) -> Self {
        if limit == 0 {
            return TimerUrgency::Critical;
        }
        // remaining / limit < 1/4  <=>  4 * remaining < limit
        let scaled = u64::from(remaining) * 4;
        let limit = u64::from(limit);
        if scaled < limit {
            TimerUrgency::Critical
        } else if scaled < limit * 2 {
            TimerUrgency::Warning
        } else {
            TimerUrgency::Calm
        }
    }
}

/// Display projection of the question currently being played.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizView<'a> {
    pub question: &'a Question,
    /// 1-based question number.
    pub number: usize,
    pub total: usize,
    pub score: u32,
    pub progress: f64,
    pub time_remaining: u32,
    pub urgency: TimerUrgency,
    pub selected: Option<Answer>,
    pub answered: bool,
    pub is_last_question: bool,
}

impl QuizView<'_> {
    /// Whether the resolved answer was correct. `None` until answered.
    #[must_use]
    pub fn was_correct(&self) -> Option<bool> {
        if !self.answered {
            return None;
        }
        Some(
            self.selected
                .and_then(Answer::index)
                .is_some_and(|index| self.question.is_correct(index)),
        )
    }

    /// Explanation text, revealed once the question is resolved.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        if self.answered {
            self.question.explanation()
        } else {
            None
        }
    }
}

/// Final outcome of a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: u32,
    pub total_questions: u32,
    pub history: Vec<Answer>,
}

impl QuizResult {
    /// Share of correct answers, rounded to a whole percent.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percent_of(self.score, self.total_questions)
    }

    #[must_use]
    pub fn timeouts(&self) -> usize {
        self.history.iter().filter(|a| a.is_timeout()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_thresholds() {
        assert_eq!(TimerUrgency::classify(30, 30), TimerUrgency::Calm);
        assert_eq!(TimerUrgency::classify(15, 30), TimerUrgency::Calm);
        assert_eq!(TimerUrgency::classify(14, 30), TimerUrgency::Warning);
        assert_eq!(TimerUrgency::classify(8, 30), TimerUrgency::Warning);
        assert_eq!(TimerUrgency::classify(7, 30), TimerUrgency::Critical);
        assert_eq!(TimerUrgency::classify(0, 30), TimerUrgency::Critical);
    }

    #[test]
    fn result_percentage_and_timeouts() {
        let result = QuizResult {
            score: 1,
            total_questions: 3,
            history: vec![Answer::TimedOut, Answer::Selected(0), Answer::Selected(2)],
        };
        assert_eq!(result.percentage(), 33);
        assert_eq!(result.timeouts(), 1);
    }

    #[test]
    fn result_serializes_timeouts_as_minus_one() {
        let result = QuizResult {
            score: 1,
            total_questions: 2,
            history: vec![Answer::TimedOut, Answer::Selected(1)],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"score":1,"totalQuestions":2,"history":[-1,1]}"#);
    }
}
