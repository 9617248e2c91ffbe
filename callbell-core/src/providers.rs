//! Capability contracts for the external calendar and telephony services.
//!
//! The cycle orchestrator only ever sees these traits, so its unit tests
//! run against in-memory fakes with no network.

use async_trait::async_trait;

use crate::error::CallbellResult;
use crate::event::UpcomingEvent;

/// Read-only access to a user's near-term calendar.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Events starting within the look-ahead window, ordered by start time.
    ///
    /// Returns an empty list (not an error) when the user has no usable
    /// credential.
    async fn upcoming_events(&self, user_id: &str) -> CallbellResult<Vec<UpcomingEvent>>;
}

/// Outbound voice calls.
#[async_trait]
pub trait CallDialer: Send + Sync {
    /// Place one call to `to` (E.164) announcing `event`.
    ///
    /// Returns the provider-assigned call id. Fire-and-forget: the call is
    /// considered placed once the provider accepts it, not when answered.
    async fn place_call(&self, to: &str, event: &UpcomingEvent) -> CallbellResult<String>;
}
