use thiserror::Error;

use crate::leaderboard::DEFAULT_CAPACITY;

/// Seconds allowed per question unless configured otherwise.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;

/// Number of leaderboard rows shown to players.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("time limit must be > 0 seconds")]
    ZeroTimeLimit,

    #[error("leaderboard capacity must be > 0")]
    ZeroCapacity,

    #[error("display limit must be > 0")]
    ZeroDisplayLimit,
}

/// Validated quiz settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    time_limit_secs: u32,
    leaderboard_capacity: usize,
    display_limit: usize,
}

/// Partially specified settings; unset fields fall back to defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizConfigDraft {
    pub time_limit_secs: Option<u32>,
    pub leaderboard_capacity: Option<usize>,
    pub display_limit: Option<usize>,
}

impl QuizConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if any provided value is zero.
    pub fn validate(self) -> Result<QuizConfig, ConfigError> {
        let time_limit_secs = self.time_limit_secs.unwrap_or(DEFAULT_TIME_LIMIT_SECS);
        let leaderboard_capacity = self.leaderboard_capacity.unwrap_or(DEFAULT_CAPACITY);
        let display_limit = self.display_limit.unwrap_or(DEFAULT_DISPLAY_LIMIT);

        if time_limit_secs == 0 {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if leaderboard_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if display_limit == 0 {
            return Err(ConfigError::ZeroDisplayLimit);
        }

        Ok(QuizConfig {
            time_limit_secs,
            leaderboard_capacity,
            display_limit,
        })
    }
}

impl QuizConfig {
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn leaderboard_capacity(&self) -> usize {
        self.leaderboard_capacity
    }

    #[must_use]
    pub fn display_limit(&self) -> usize {
        self.display_limit
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            leaderboard_capacity: DEFAULT_CAPACITY,
            display_limit: DEFAULT_DISPLAY_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_yields_defaults() {
        assert_eq!(QuizConfigDraft::new().validate().unwrap(), QuizConfig::default());
    }

    #[test]
    fn zero_time_limit_rejected() {
        let draft = QuizConfigDraft {
            time_limit_secs: Some(0),
            ..QuizConfigDraft::default()
        };
        assert_eq!(draft.validate().unwrap_err(), ConfigError::ZeroTimeLimit);
    }

    #[test]
    fn overrides_apply() {
        let config = QuizConfigDraft {
            time_limit_secs: Some(15),
            leaderboard_capacity: Some(5),
            display_limit: Some(3),
        }
        .validate()
        .unwrap();
        assert_eq!(config.time_limit_secs(), 15);
        assert_eq!(config.leaderboard_capacity(), 5);
        assert_eq!(config.display_limit(), 3);
    }
}
