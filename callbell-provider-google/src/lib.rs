//! Google Calendar provider for callbell.
//!
//! Wraps the `google-calendar` client behind the core `CalendarSource`
//! contract: token refresh against stored credentials, then a primary-
//! calendar listing limited to the look-ahead window.

pub mod events;
pub mod tokens;

pub use events::GoogleCalendarSource;

use serde::Deserialize;

/// Google OAuth client credentials (application-level, not per-user).
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
}
