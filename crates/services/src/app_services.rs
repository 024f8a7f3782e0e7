use std::sync::Arc;

use quiz_core::QuizConfig;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::leaderboard_service::LeaderboardService;
use crate::profile_service::ProfileService;
use crate::sessions::QuizLoopService;

/// Assembles app-facing services over a single store.
#[derive(Clone)]
pub struct AppServices {
    config: QuizConfig,
    leaderboard: Arc<LeaderboardService>,
    profiles: Arc<ProfileService>,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: QuizConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, config))
    }

    /// Build services over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock, config: QuizConfig) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, config)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, config: QuizConfig) -> Self {
        let leaderboard = Arc::new(LeaderboardService::new(
            clock,
            Arc::clone(&storage.store),
            config.leaderboard_capacity(),
        ));
        let profiles = Arc::new(ProfileService::new(Arc::clone(&storage.store)));
        let quiz_loop = Arc::new(QuizLoopService::new(
            config,
            Arc::clone(&leaderboard),
            Arc::clone(&profiles),
        ));

        Self {
            config,
            leaderboard,
            profiles,
            quiz_loop,
        }
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.config
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}
