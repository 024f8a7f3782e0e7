use std::sync::Arc;
use std::time::Duration;

use quiz_core::QuizConfig;
use quiz_core::model::{Question, Username};

use super::engine::{Advance, AnswerOutcome, QuizSession, TickOutcome};
use super::timer::{Tick, TickTask, Ticker};
use crate::error::LeaderboardError;
use crate::leaderboard_service::{LeaderboardService, RecordOutcome};
use crate::profile_service::ProfileService;

/// Countdown resolution.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

//
// ─── TIMED QUIZ ────────────────────────────────────────────────────────────────
//

/// A `QuizSession` driven by a real countdown.
///
/// Exactly one countdown task runs while a question awaits an answer, and none
/// otherwise. Every mutation re-syncs the task, so the countdown for a question
/// is cancelled in the same call that resolves it. Ticks from a cancelled task
/// that were already queued are discarded by `apply_tick`.
pub struct TimedQuiz {
    session: QuizSession,
    ticker: Ticker,
    timer: Option<TickTask>,
}

impl TimedQuiz {
    /// Wrap an idle session. Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(session: QuizSession, period: Duration) -> Self {
        Self {
            session,
            ticker: Ticker::new(period),
            timer: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Begin a fresh run with a fresh countdown.
    pub fn start(&mut self) {
        self.timer = None;
        self.session.start();
        self.sync_timer();
    }

    pub fn select_answer(&mut self, index: usize) -> AnswerOutcome {
        let outcome = self.session.select_answer(index);
        self.sync_timer();
        outcome
    }

    pub fn next_question(&mut self) -> Advance {
        let advance = self.session.next_question();
        self.sync_timer();
        advance
    }

    pub fn reset(&mut self) {
        self.timer = None;
        self.session.reset();
    }

    /// Wait for the next tick.
    ///
    /// Stays pending while no countdown is running, so it can sit in a
    /// `tokio::select!` next to input handling.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.ticker.recv().await
    }

    /// Apply a tick received from `next_tick`.
    ///
    /// Ticks that do not belong to the current countdown are ignored.
    pub fn apply_tick(&mut self, tick: Tick) -> TickOutcome {
        let current = self.timer.as_ref().is_some_and(|timer| timer.owns(tick));
        if !current {
            tracing::debug!(generation = tick.generation(), "stale tick ignored");
            return TickOutcome::Ignored;
        }
        let outcome = self.session.tick();
        if outcome == TickOutcome::TimedOut {
            tracing::debug!(
                question_index = self.session.question_index(),
                "question timed out"
            );
        }
        self.sync_timer();
        outcome
    }

    /// Wait for and apply the next tick.
    pub async fn run_tick(&mut self) -> TickOutcome {
        match self.next_tick().await {
            Some(tick) => self.apply_tick(tick),
            None => TickOutcome::Ignored,
        }
    }

    fn sync_timer(&mut self) {
        if !self.session.is_awaiting_answer() {
            self.timer = None;
        } else if self.timer.is_none() {
            self.timer = Some(self.ticker.spawn());
        }
    }
}

impl std::fmt::Debug for TimedQuiz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedQuiz")
            .field("session", &self.session)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

//
// ─── QUIZ LOOP ─────────────────────────────────────────────────────────────────
//

/// What happened when a finished run was handed to `record_finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The run is not finished or scored nothing; the board was not touched.
    Skipped,
    Recorded(RecordOutcome),
}

/// Starts timed runs and records their results.
#[derive(Clone)]
pub struct QuizLoopService {
    config: QuizConfig,
    leaderboard: Arc<LeaderboardService>,
    profiles: Arc<ProfileService>,
    tick_period: Duration,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        config: QuizConfig,
        leaderboard: Arc<LeaderboardService>,
        profiles: Arc<ProfileService>,
    ) -> Self {
        Self {
            config,
            leaderboard,
            profiles,
            tick_period: TICK_PERIOD,
        }
    }

    #[must_use]
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.config
    }

    /// Start a timed run over `questions`.
    #[must_use]
    pub fn start_quiz(&self, questions: impl Into<Arc<[Question]>>) -> TimedQuiz {
        let session = QuizSession::new(questions, self.config.time_limit_secs());
        let mut quiz = TimedQuiz::new(session, self.tick_period);
        quiz.start();
        tracing::debug!(
            total_questions = quiz.session().total_questions(),
            time_limit = self.config.time_limit_secs(),
            "quiz started"
        );
        quiz
    }

    /// Record a finished run for `username` and remember them as the last player.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError` if the session's score cannot form a valid entry.
    pub async fn record_finished(
        &self,
        session: &QuizSession,
        username: &Username,
    ) -> Result<CompletionOutcome, LeaderboardError> {
        let Some(result) = session.result() else {
            return Ok(CompletionOutcome::Skipped);
        };
        tracing::info!(
            username = %username,
            score = result.score,
            total = result.total_questions,
            timeouts = result.timeouts(),
            "quiz finished"
        );
        if result.score == 0 {
            return Ok(CompletionOutcome::Skipped);
        }

        self.profiles.remember(username).await;
        let outcome = self
            .leaderboard
            .record_result(username.clone(), result.score, result.total_questions)
            .await?;
        Ok(CompletionOutcome::Recorded(outcome))
    }
}
