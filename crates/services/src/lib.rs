#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod leaderboard_service;
pub mod profile_service;
pub mod question_bank;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, LeaderboardError, ProfileError, QuestionBankError};
pub use leaderboard_service::{LeaderboardService, RecordOutcome};
pub use profile_service::ProfileService;
pub use question_bank::parse_question_bank;

pub use sessions::{
    Advance, AnswerOutcome, CompletionOutcome, QuizLoopService, QuizResult, QuizSession,
    QuizStatus, QuizView, TickOutcome, TimedQuiz, TimerUrgency,
};
