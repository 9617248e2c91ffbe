//! Provider-neutral calendar event types.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Forward span within which an event triggers a reminder call.
pub const LOOK_AHEAD_MINUTES: i64 = 5;

/// A calendar event starting inside the look-ahead window.
///
/// Produced fresh on every fetch and never persisted; once a call goes out,
/// only the (user, event, start) key survives in the reminder ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    /// Provider-assigned id, unique within the calendar.
    pub id: String,
    pub summary: String,
    pub start: DateTime<Utc>,
    /// Falls back to `start` when the provider gives no end.
    pub end: DateTime<Utc>,
    /// IANA zone of the event's start, used to speak a local wall-clock time.
    pub time_zone: Tz,
    /// Link back to the event in the provider's UI, when given.
    pub html_link: Option<String>,
}
