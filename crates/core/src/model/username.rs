use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsernameError {
    #[error("username cannot be empty")]
    Empty,
    #[error("username must be at most {max} characters")]
    TooLong { max: usize },
}

/// Longest accepted name, in characters.
pub const MAX_USERNAME_CHARS: usize = 40;

/// A player's display name and leaderboard identity.
///
/// Surrounding whitespace is trimmed; the original casing is kept for display.
/// Two usernames identify the same player when they match case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// # Errors
    ///
    /// Returns `UsernameError` if the name is blank or longer than
    /// `MAX_USERNAME_CHARS`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, UsernameError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }
        if trimmed.chars().count() > MAX_USERNAME_CHARS {
            return Err(UsernameError::TooLong {
                max: MAX_USERNAME_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used as the identity key.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// True when both names refer to the same player.
    #[must_use]
    pub fn same_player(&self, other: &Username) -> bool {
        self.0 == other.0 || self.key() == other.key()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
