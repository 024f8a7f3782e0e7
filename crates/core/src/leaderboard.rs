//! Personal-best leaderboard ranking and merge.
//!
//! A [`Leaderboard`] holds at most one entry per player (usernames compared
//! case-insensitively), ordered by score descending and then by date descending,
//! and never holds more than its capacity.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::model::{EntryId, LeaderboardEntry, ScoreSubmission, Username};

/// Maximum number of entries retained by default.
pub const DEFAULT_CAPACITY: usize = 50;

/// What a merge did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First score for this player.
    Inserted { id: EntryId },
    /// The submission beat the player's previous best.
    Improved { id: EntryId, previous: u32 },
    /// The submission did not beat the stored best; nothing changed.
    Kept { id: EntryId, best: u32 },
}

impl MergeOutcome {
    #[must_use]
    pub fn id(&self) -> &EntryId {
        match self {
            MergeOutcome::Inserted { id }
            | MergeOutcome::Improved { id, .. }
            | MergeOutcome::Kept { id, .. } => id,
        }
    }

    /// True when the board changed and needs to be persisted.
    #[must_use]
    pub fn changed(&self) -> bool {
        !matches!(self, MergeOutcome::Kept { .. })
    }

    /// Best score held before this merge, if the player was already ranked.
    #[must_use]
    pub fn previous_best(&self) -> Option<u32> {
        match *self {
            MergeOutcome::Inserted { .. } => None,
            MergeOutcome::Improved { previous, .. } => Some(previous),
            MergeOutcome::Kept { best, .. } => Some(best),
        }
    }
}

fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score()
        .cmp(&a.score())
        .then_with(|| b.date().cmp(&a.date()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Leaderboard {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Build a board from loaded entries, restoring the ordering, uniqueness and
    /// capacity invariants. When a player appears twice the higher-ranked entry wins.
    #[must_use]
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>, capacity: usize) -> Self {
        entries.sort_by(rank_order);
        let mut seen = HashSet::with_capacity(entries.len());
        entries.retain(|entry| seen.insert(entry.username().key()));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first `n` ranked entries.
    #[must_use]
    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    #[must_use]
    pub fn find(&self, username: &Username) -> Option<&LeaderboardEntry> {
        self.entries
            .iter()
            .find(|entry| entry.username().same_player(username))
    }

    /// 1-based rank of the player, if ranked.
    #[must_use]
    pub fn rank_of(&self, username: &Username) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.username().same_player(username))
            .map(|pos| pos + 1)
    }

    /// Merge a finished result into the board.
    ///
    /// An existing player's entry is only replaced by a strictly higher score;
    /// the entry keeps its id and first-seen username casing. A new player gets a
    /// fresh entry. The board is then re-sorted and truncated to capacity, which
    /// may drop the new entry again if it ranks last on a full board.
    pub fn merge(&mut self, submission: &ScoreSubmission, now: DateTime<Utc>) -> MergeOutcome {
        let existing = self
            .entries
            .iter_mut()
            .find(|entry| entry.username().same_player(submission.username()));

        let outcome = match existing {
            Some(entry) if submission.score() > entry.score() => {
                let previous = entry.score();
                entry.improve(submission, now);
                MergeOutcome::Improved {
                    id: entry.id().clone(),
                    previous,
                }
            }
            Some(entry) => {
                return MergeOutcome::Kept {
                    id: entry.id().clone(),
                    best: entry.score(),
                };
            }
            None => {
                let id = EntryId::generate();
                self.entries
                    .push(LeaderboardEntry::from_submission(id.clone(), submission, now));
                MergeOutcome::Inserted { id }
            }
        };

        self.entries.sort_by(rank_order);
        self.entries.truncate(self.capacity);
        outcome
    }
}
