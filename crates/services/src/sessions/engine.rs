use std::fmt;
use std::sync::Arc;

use quiz_core::model::{Answer, Question};

use super::progress::{QuizResult, QuizView, TimerUrgency};

//
// ─── STATUS & OUTCOMES ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    Idle,
    Playing,
    Finished,
}

/// Result of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No question was awaiting an answer; nothing changed.
    Ignored,
    /// One second elapsed.
    Counted { remaining: u32 },
    /// The countdown ran out and the question was resolved as a timeout.
    TimedOut,
}

/// Result of `select_answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The question was already resolved or the quiz is not running.
    Ignored,
    Recorded { correct: bool },
}

/// Result of `next_question`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The current question has not been resolved yet.
    Ignored,
    /// Moved on to the question at this index.
    Next { index: usize },
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine for one timed quiz run.
///
/// Steps through a fixed list of questions. Each question is resolved exactly
/// once, either by `select_answer` or by the countdown reaching zero in `tick`;
/// `answered` guards both paths so a question can never be scored twice.
/// The session performs no I/O and never fails: an empty question list simply
/// never has a current question.
#[derive(Clone)]
pub struct QuizSession {
    questions: Arc<[Question]>,
    time_limit: u32,
    question_index: usize,
    score: u32,
    selected: Option<Answer>,
    answered: bool,
    time_remaining: u32,
    status: QuizStatus,
    history: Vec<Answer>,
}

impl QuizSession {
    /// Create an idle session over `questions` with `time_limit` seconds per question.
    #[must_use]
    pub fn new(questions: impl Into<Arc<[Question]>>, time_limit: u32) -> Self {
        Self {
            questions: questions.into(),
            time_limit,
            question_index: 0,
            score: 0,
            selected: None,
            answered: false,
            time_remaining: time_limit,
            status: QuizStatus::Idle,
            history: Vec::new(),
        }
    }

    fn clear(&mut self, status: QuizStatus) {
        self.question_index = 0;
        self.score = 0;
        self.selected = None;
        self.answered = false;
        self.time_remaining = self.time_limit;
        self.history.clear();
        self.status = status;
    }

    /// Begin a fresh run. Valid from any state.
    pub fn start(&mut self) {
        self.clear(QuizStatus::Playing);
    }

    /// Abandon the run and return to `Idle`.
    pub fn reset(&mut self) {
        self.clear(QuizStatus::Idle);
    }

    /// True while a question is on screen and unresolved; the countdown should
    /// only run in this state.
    #[must_use]
    pub fn is_awaiting_answer(&self) -> bool {
        self.status == QuizStatus::Playing && !self.answered && self.current_question().is_some()
    }

    /// Count down one second.
    ///
    /// The tick that brings the countdown to zero resolves the question as a
    /// timeout, which is recorded in the history and never scores.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_awaiting_answer() {
            return TickOutcome::Ignored;
        }

        if self.time_remaining <= 1 {
            self.time_remaining = 0;
            self.answered = true;
            self.selected = Some(Answer::TimedOut);
            self.history.push(Answer::TimedOut);
            return TickOutcome::TimedOut;
        }

        self.time_remaining -= 1;
        TickOutcome::Counted {
            remaining: self.time_remaining,
        }
    }

    /// Answer the current question with the option at `index`.
    pub fn select_answer(&mut self, index: usize) -> AnswerOutcome {
        if !self.is_awaiting_answer() {
            return AnswerOutcome::Ignored;
        }
        let Some(question) = self.current_question() else {
            return AnswerOutcome::Ignored;
        };

        let correct = question.is_correct(index);
        self.selected = Some(Answer::Selected(index));
        self.answered = true;
        if correct {
            self.score += 1;
        }
        self.history.push(Answer::Selected(index));
        AnswerOutcome::Recorded { correct }
    }

    /// Move past a resolved question. Finishes the run after the last one.
    pub fn next_question(&mut self) -> Advance {
        if self.status != QuizStatus::Playing || !self.answered {
            return Advance::Ignored;
        }

        let next = self.question_index + 1;
        if next >= self.questions.len() {
            self.status = QuizStatus::Finished;
            return Advance::Finished;
        }

        self.question_index = next;
        self.selected = None;
        self.answered = false;
        self.time_remaining = self.time_limit;
        Advance::Next { index: next }
    }

    #[must_use]
    pub fn status(&self) -> QuizStatus {
        self.status
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<Answer> {
        self.selected
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    #[must_use]
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn history(&self) -> &[Answer] {
        &self.history
    }

    /// The question currently being asked. `None` when idle-with-no-questions,
    /// finished, or out of range.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.status == QuizStatus::Finished {
            return None;
        }
        self.questions.get(self.question_index)
    }

    /// Percentage through the quiz, counting the current question.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.question_index + 1) as f64 / self.questions.len() as f64 * 100.0
    }

    /// Snapshot of the question being played, for display.
    #[must_use]
    pub fn view(&self) -> Option<QuizView<'_>> {
        if self.status != QuizStatus::Playing {
            return None;
        }
        let question = self.current_question()?;
        Some(QuizView {
            question,
            number: self.question_index + 1,
            total: self.questions.len(),
            score: self.score,
            progress: self.progress(),
            time_remaining: self.time_remaining,
            urgency: TimerUrgency::classify(self.time_remaining, self.time_limit),
            selected: self.selected,
            answered: self.answered,
            is_last_question: self.question_index + 1 == self.questions.len(),
        })
    }

    /// Final result, available once the run is finished.
    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        if self.status != QuizStatus::Finished {
            return None;
        }
        Some(QuizResult {
            score: self.score,
            total_questions: u32::try_from(self.questions.len()).unwrap_or(u32::MAX),
            history: self.history.clone(),
        })
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("status", &self.status)
            .field("question_index", &self.question_index)
            .field("score", &self.score)
            .field("answered", &self.answered)
            .field("time_remaining", &self.time_remaining)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Difficulty, QuestionDraft};

    fn question(id: u64, correct_index: usize) -> Question {
        QuestionDraft {
            id,
            prompt: format!("Test question {id}?"),
            options: vec![
                "Option A".into(),
                "Option B".into(),
                "Option C".into(),
                "Option D".into(),
            ],
            correct_index,
            explanation: Some(format!("Test explanation {id}")),
            category: "Test".into(),
            difficulty: Difficulty::Easy,
        }
        .validate()
        .unwrap()
    }

    fn two_question_session() -> QuizSession {
        QuizSession::new(vec![question(1, 0), question(2, 1)], 30)
    }

    fn play(answers: &[Option<usize>]) -> QuizSession {
        let mut session = two_question_session();
        session.start();
        for answer in answers {
            match answer {
                Some(index) => {
                    session.select_answer(*index);
                }
                None => {
                    while session.tick() != TickOutcome::TimedOut {}
                }
            }
            session.next_question();
        }
        session
    }

    #[test]
    fn starts_idle() {
        let session = two_question_session();
        assert_eq!(session.status(), QuizStatus::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.question_index(), 0);
        assert!(session.view().is_none());
    }

    #[test]
    fn start_resets_to_playing() {
        let mut session = two_question_session();
        session.start();
        session.select_answer(0);
        session.next_question();
        session.tick();

        session.start();

        assert_eq!(session.status(), QuizStatus::Playing);
        assert_eq!(session.time_remaining(), 30);
        assert_eq!(session.question_index(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.history().is_empty());
        assert_eq!(session.selected_answer(), None);
    }

    #[test]
    fn start_after_finish_begins_a_fresh_run() {
        let mut session = play(&[None, Some(1)]);
        assert_eq!(session.status(), QuizStatus::Finished);

        session.start();

        assert_eq!(session.status(), QuizStatus::Playing);
        assert_eq!(session.question_index(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.history().is_empty());
        assert!(!session.is_answered());
        assert_eq!(session.selected_answer(), None);
        assert_eq!(session.time_remaining(), 30);
        assert!(session.result().is_none());
        assert!(session.is_awaiting_answer());
        assert_eq!(session.current_question().map(Question::correct_index), Some(0));
    }

    #[test]
    fn correct_answer_scores() {
        let mut session = two_question_session();
        session.start();
        assert_eq!(
            session.select_answer(0),
            AnswerOutcome::Recorded { correct: true }
        );
        assert_eq!(session.score(), 1);
        assert!(session.is_answered());
    }

    #[test]
    fn wrong_answer_does_not_score() {
        let mut session = two_question_session();
        session.start();
        assert_eq!(
            session.select_answer(1),
            AnswerOutcome::Recorded { correct: false }
        );
        assert_eq!(session.score(), 0);
        assert!(session.is_answered());
    }

    #[test]
    fn second_selection_is_ignored() {
        let mut session = two_question_session();
        session.start();
        session.select_answer(0);

        assert_eq!(session.select_answer(0), AnswerOutcome::Ignored);
        assert_eq!(session.select_answer(2), AnswerOutcome::Ignored);
        assert_eq!(session.score(), 1);
        assert_eq!(session.history(), &[Answer::Selected(0)]);
        assert_eq!(session.selected_answer(), Some(Answer::Selected(0)));
    }

    #[test]
    fn selection_ignored_unless_playing() {
        let mut session = two_question_session();
        assert_eq!(session.select_answer(0), AnswerOutcome::Ignored);
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert!(session.history().is_empty());
    }

    #[test]
    fn next_requires_resolution() {
        let mut session = two_question_session();
        session.start();
        assert_eq!(session.next_question(), Advance::Ignored);
        assert_eq!(session.question_index(), 0);
    }

    #[test]
    fn advances_with_fresh_question_state() {
        let mut session = two_question_session();
        session.start();
        session.tick();
        session.select_answer(0);

        assert_eq!(session.next_question(), Advance::Next { index: 1 });
        assert_eq!(session.question_index(), 1);
        assert!(!session.is_answered());
        assert_eq!(session.selected_answer(), None);
        assert_eq!(session.time_remaining(), 30);
    }

    #[test]
    fn finishing_freezes_result() {
        let mut session = play(&[Some(0), Some(1)]);

        assert_eq!(session.status(), QuizStatus::Finished);
        assert!(session.current_question().is_none());
        assert_eq!(session.next_question(), Advance::Ignored);
        assert_eq!(session.select_answer(1), AnswerOutcome::Ignored);
        assert_eq!(session.tick(), TickOutcome::Ignored);

        let result = session.result().unwrap();
        assert_eq!(result.score, 2);
        assert_eq!(result.total_questions, 2);
        assert_eq!(result.history, vec![Answer::Selected(0), Answer::Selected(1)]);
    }

    #[test]
    fn countdown_times_out_on_reaching_zero() {
        let mut session = two_question_session();
        session.start();

        for expected in (1..30).rev() {
            assert_eq!(session.tick(), TickOutcome::Counted { remaining: expected });
        }
        assert_eq!(session.tick(), TickOutcome::TimedOut);

        assert_eq!(session.time_remaining(), 0);
        assert!(session.is_answered());
        assert_eq!(session.score(), 0);
        assert_eq!(session.history(), &[Answer::TimedOut]);
        assert_eq!(session.selected_answer(), Some(Answer::TimedOut));
    }

    #[test]
    fn tick_after_answer_is_ignored() {
        let mut session = two_question_session();
        session.start();
        session.tick();
        session.select_answer(0);

        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.time_remaining(), 29);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn answer_after_timeout_is_ignored() {
        let mut session = QuizSession::new(vec![question(1, 0)], 1);
        session.start();
        assert_eq!(session.tick(), TickOutcome::TimedOut);

        assert_eq!(session.select_answer(0), AnswerOutcome::Ignored);
        assert_eq!(session.score(), 0);
        assert_eq!(session.history(), &[Answer::TimedOut]);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = two_question_session();
        session.start();
        session.select_answer(0);

        session.reset();

        assert_eq!(session.status(), QuizStatus::Idle);
        assert_eq!(session.score(), 0);
        assert!(session.history().is_empty());
        assert!(!session.is_answered());
        assert_eq!(session.time_remaining(), 30);
    }

    #[test]
    fn all_correct_scores_two_of_two() {
        let session = play(&[Some(0), Some(1)]);
        assert_eq!(session.result().unwrap().score, 2);
    }

    #[test]
    fn one_wrong_scores_one_of_two() {
        let session = play(&[Some(1), Some(1)]);
        let result = session.result().unwrap();
        assert_eq!((result.score, result.total_questions), (1, 2));
    }

    #[test]
    fn timeout_then_correct_scores_one_of_two() {
        let session = play(&[None, Some(1)]);
        let result = session.result().unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.history, vec![Answer::TimedOut, Answer::Selected(1)]);
    }

    #[test]
    fn one_history_entry_per_question_and_bounded_score() {
        let patterns: [&[Option<usize>]; 4] = [
            &[Some(0), Some(1)],
            &[None, None],
            &[Some(3), None],
            &[None, Some(0)],
        ];
        for pattern in patterns {
            let mut session = two_question_session();
            session.start();
            let mut last_score = 0;
            for (i, answer) in pattern.iter().enumerate() {
                match answer {
                    Some(index) => {
                        session.select_answer(*index);
                        session.select_answer(*index);
                    }
                    None => while session.tick() != TickOutcome::TimedOut {},
                }
                session.tick();
                assert_eq!(session.history().len(), i + 1);
                assert!(session.score() >= last_score);
                assert!(session.score() as usize <= session.total_questions());
                last_score = session.score();
                session.next_question();
            }
            assert_eq!(session.status(), QuizStatus::Finished);
        }
    }

    #[test]
    fn progress_counts_current_question() {
        let mut session = two_question_session();
        session.start();
        assert!((session.progress() - 50.0).abs() < f64::EPSILON);
        session.select_answer(0);
        session.next_question();
        assert!((session.progress() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_question_list_is_inert() {
        let mut session = QuizSession::new(Vec::<Question>::new(), 30);
        session.start();

        assert_eq!(session.status(), QuizStatus::Playing);
        assert!(session.current_question().is_none());
        assert!(session.progress().abs() < f64::EPSILON);
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.select_answer(0), AnswerOutcome::Ignored);
        assert_eq!(session.next_question(), Advance::Ignored);
        assert!(!session.is_awaiting_answer());
    }

    #[test]
    fn view_reports_last_question_and_explanation() {
        let mut session = two_question_session();
        session.start();
        let view = session.view().unwrap();
        assert_eq!((view.number, view.total), (1, 2));
        assert!(!view.is_last_question);
        assert_eq!(view.explanation(), None);

        session.select_answer(2);
        session.next_question();
        session.select_answer(1);
        let view = session.view().unwrap();
        assert!(view.is_last_question);
        assert_eq!(view.was_correct(), Some(true));
        assert_eq!(view.explanation(), Some("Test explanation 2"));
    }
}
