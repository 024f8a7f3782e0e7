mod engine;
mod progress;
mod timer;
mod workflow;

// Public API of the quiz session subsystem.
pub use engine::{Advance, AnswerOutcome, QuizSession, QuizStatus, TickOutcome};
pub use progress::{QuizResult, QuizView, TimerUrgency};
pub use timer::{Tick, TickTask, Ticker};
pub use workflow::{CompletionOutcome, QuizLoopService, TICK_PERIOD, TimedQuiz};
