mod answer;
mod entry;
mod ids;
mod question;
mod username;

pub use answer::{Answer, AnswerError};
pub use entry::{EntryError, LeaderboardEntry, ScoreSubmission, percent_of};
pub use ids::{EntryId, ParseIdError, QuestionId};
pub use question::{Difficulty, Question, QuestionDraft, QuestionError};
pub use username::{MAX_USERNAME_CHARS, Username, UsernameError};
