use std::sync::Arc;

use tokio::sync::Mutex;

use quiz_core::leaderboard::{Leaderboard, MergeOutcome};
use quiz_core::model::{ScoreSubmission, Username};
use storage::records::{decode_leaderboard, encode_leaderboard};
use storage::repository::{LocalStore, keys};

use crate::Clock;
use crate::error::LeaderboardError;

/// Result of recording a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub merge: MergeOutcome,
    /// Ranked board after the merge.
    pub board: Leaderboard,
    /// 1-based rank of the player, if still on the board.
    pub rank: Option<usize>,
    /// False if the updated board could not be written back.
    pub saved: bool,
}

impl RecordOutcome {
    #[must_use]
    pub fn is_new_best(&self) -> bool {
        self.merge.changed()
    }
}

/// Loads, merges and persists the personal-best leaderboard.
///
/// Reads never fail: a missing, unreadable or corrupt blob is treated as an
/// empty board. Failed writes are logged and the in-memory board is still
/// returned.
#[derive(Clone)]
pub struct LeaderboardService {
    clock: Clock,
    store: Arc<dyn LocalStore>,
    capacity: usize,
    write_lock: Arc<Mutex<()>>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn LocalStore>, capacity: usize) -> Self {
        Self {
            clock,
            store,
            capacity,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The persisted board, sorted and capped.
    pub async fn ranked(&self) -> Leaderboard {
        self.load().await
    }

    /// Merge a finished result into the persisted board.
    ///
    /// Only a strictly higher score replaces a player's stored best. The
    /// load-merge-save cycle is serialized across clones of this service.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::InvalidSubmission` if `total_questions` is zero
    /// or `score` exceeds it.
    pub async fn record_result(
        &self,
        username: Username,
        score: u32,
        total_questions: u32,
    ) -> Result<RecordOutcome, LeaderboardError> {
        let submission = ScoreSubmission::new(username, score, total_questions)?;

        let _guard = self.write_lock.lock().await;
        let mut board = self.load().await;
        let merge = board.merge(&submission, self.clock.now());
        tracing::debug!(
            username = %submission.username(),
            score,
            ?merge,
            "merged quiz result"
        );

        let saved = if merge.changed() {
            self.save(&board).await
        } else {
            true
        };

        let rank = board.rank_of(submission.username());
        Ok(RecordOutcome {
            merge,
            board,
            rank,
            saved,
        })
    }

    async fn load(&self) -> Leaderboard {
        let raw = match self.store.get(keys::LEADERBOARD).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Leaderboard::new(self.capacity),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read leaderboard, using empty board");
                return Leaderboard::new(self.capacity);
            }
        };

        match decode_leaderboard(&raw) {
            Ok(decoded) => {
                if decoded.rejected > 0 {
                    tracing::warn!(
                        rejected = decoded.rejected,
                        "dropped invalid leaderboard records"
                    );
                }
                Leaderboard::from_entries(decoded.entries, self.capacity)
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt leaderboard");
                Leaderboard::new(self.capacity)
            }
        }
    }

    async fn save(&self, board: &Leaderboard) -> bool {
        let result = match encode_leaderboard(board.entries()) {
            Ok(raw) => self.store.set(keys::LEADERBOARD, &raw).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to save leaderboard");
                false
            }
        }
    }
}
