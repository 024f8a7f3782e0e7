//! Serialized shapes for the values kept in a [`LocalStore`](crate::LocalStore).
//!
//! These mirror the domain types so the JSON layout stays stable without
//! leaking storage concerns into `quiz-core`.

use chrono::{DateTime, Utc};
use quiz_core::model::{EntryId, LeaderboardEntry, Username};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Persisted shape of a leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryRecord {
    pub id: String,
    pub username: String,
    pub score: u32,
    pub date: DateTime<Utc>,
    pub total_questions: u32,
    pub correct_answers: u32,
}

impl LeaderboardEntryRecord {
    #[must_use]
    pub fn from_entry(entry: &LeaderboardEntry) -> Self {
        Self {
            id: entry.id().as_str().to_owned(),
            username: entry.username().as_str().to_owned(),
            score: entry.score(),
            date: entry.date(),
            total_questions: entry.total_questions(),
            correct_answers: entry.correct_answers(),
        }
    }

    /// Convert the record back into a domain entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the id, username or totals are invalid.
    pub fn into_entry(self) -> Result<LeaderboardEntry, StorageError> {
        let id: EntryId = self.id.parse().map_err(ser)?;
        let username = Username::parse(self.username).map_err(ser)?;
        LeaderboardEntry::from_persisted(
            id,
            username,
            self.score,
            self.total_questions,
            self.correct_answers,
            self.date,
        )
        .map_err(ser)
    }
}

/// Persisted shape of the saved player profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub username: String,
}

/// Entries recovered from a stored leaderboard blob.
#[derive(Debug, Default)]
pub struct DecodedLeaderboard {
    pub entries: Vec<LeaderboardEntry>,
    /// Records that parsed as JSON but failed validation and were dropped.
    pub rejected: usize,
}

/// Decode a leaderboard blob.
///
/// Individual records that fail validation are dropped and counted.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the blob is not a JSON array of records.
pub fn decode_leaderboard(raw: &str) -> Result<DecodedLeaderboard, StorageError> {
    let records: Vec<LeaderboardEntryRecord> = serde_json::from_str(raw).map_err(ser)?;
    let mut decoded = DecodedLeaderboard::default();
    for record in records {
        match record.into_entry() {
            Ok(entry) => decoded.entries.push(entry),
            Err(_) => decoded.rejected += 1,
        }
    }
    Ok(decoded)
}

/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_leaderboard(entries: &[LeaderboardEntry]) -> Result<String, StorageError> {
    let records: Vec<_> = entries
        .iter()
        .map(LeaderboardEntryRecord::from_entry)
        .collect();
    serde_json::to_string(&records).map_err(ser)
}

/// Decode the saved profile blob. A JSON `null` means no profile.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the blob is malformed or the name is blank.
pub fn decode_profile(raw: &str) -> Result<Option<Username>, StorageError> {
    let record: Option<ProfileRecord> = serde_json::from_str(raw).map_err(ser)?;
    record
        .map(|r| Username::parse(r.username).map_err(ser))
        .transpose()
}

/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_profile(username: &Username) -> Result<String, StorageError> {
    serde_json::to_string(&ProfileRecord {
        username: username.as_str().to_owned(),
    })
    .map_err(ser)
}
