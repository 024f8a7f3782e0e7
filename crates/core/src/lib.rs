#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod model;
pub mod time;

pub use config::{QuizConfig, QuizConfigDraft};
pub use error::Error;
pub use leaderboard::{Leaderboard, MergeOutcome};
pub use time::Clock;
