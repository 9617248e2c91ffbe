//! The reminder ledger: durable idempotency markers, one file per
//! (user, event, start) composite key.
//!
//! `record_reminder` creates the marker with `create_new`, which is the
//! atomic insert-if-absent the whole system's correctness rests on. When
//! two runs race on the same key, exactly one create succeeds; the loser
//! gets `DuplicateReminder` and must not count a call of its own.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CallbellError, CallbellResult};

use super::{FileStore, file_slug};

/// Marker that a reminder call went out for one composite key.
/// Append-only: never updated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub id: String,
    pub event_id: String,
    /// Start of the event instance the call announced.
    pub start_at: DateTime<Utc>,
    /// When the call was accepted by the telephony provider.
    pub called_at: DateTime<Utc>,
}

fn reminder_key(event_id: &str, start_at: &DateTime<Utc>) -> String {
    format!(
        "{}__{}",
        file_slug(event_id),
        start_at.format("%Y%m%dT%H%M%SZ")
    )
}

impl FileStore {
    fn reminder_path(&self, user_id: &str, event_id: &str, start_at: &DateTime<Utc>) -> PathBuf {
        self.reminders_dir(user_id)
            .join(format!("{}.toml", reminder_key(event_id, start_at)))
    }

    /// Whether a reminder was already sent for this composite key.
    pub fn has_been_sent(&self, user_id: &str, event_id: &str, start_at: &DateTime<Utc>) -> bool {
        self.reminder_path(user_id, event_id, start_at).exists()
    }

    /// Record that a reminder call was placed.
    ///
    /// Fails with [`CallbellError::DuplicateReminder`] when the key already
    /// exists; callers treat that as "another run claimed this reminder".
    pub fn record_reminder(
        &self,
        user_id: &str,
        event_id: &str,
        start_at: &DateTime<Utc>,
    ) -> CallbellResult<ReminderRecord> {
        let record = ReminderRecord {
            id: Uuid::new_v4().to_string(),
            event_id: event_id.to_string(),
            start_at: *start_at,
            called_at: Utc::now(),
        };

        let contents = toml::to_string_pretty(&record)
            .map_err(|e| CallbellError::Serialization(e.to_string()))?;

        let path = self.reminder_path(user_id, event_id, start_at);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    CallbellError::DuplicateReminder(event_id.to_string())
                }
                _ => CallbellError::Io(e),
            })?;
        file.write_all(contents.as_bytes())?;

        Ok(record)
    }

    /// The user's latest reminders, newest call first, at most `limit`.
    pub fn recent_reminders(
        &self,
        user_id: &str,
        limit: usize,
    ) -> CallbellResult<Vec<ReminderRecord>> {
        let dir = self.reminders_dir(user_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "toml") {
                continue;
            }
            if let Some(record) = Self::read_toml::<ReminderRecord>(&path)? {
                records.push(record);
            }
        }

        records.sort_by(|a, b| b.called_at.cmp(&a.called_at));
        records.truncate(limit);
        Ok(records)
    }
}
