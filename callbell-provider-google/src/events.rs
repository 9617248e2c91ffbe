//! Event listing for the look-ahead window.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use chrono_tz::Tz;
use google_calendar::Client;
use google_calendar::types::OrderBy;

use callbell_core::event::LOOK_AHEAD_MINUTES;
use callbell_core::{CalendarSource, CallbellError, CallbellResult, FileStore, UpcomingEvent};

use crate::GoogleCredentials;
use crate::tokens;

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Google Calendar implementation of [`CalendarSource`].
///
/// Reads the user's primary calendar only; multi-calendar support is out
/// of scope.
pub struct GoogleCalendarSource {
    creds: GoogleCredentials,
    store: FileStore,
}

impl GoogleCalendarSource {
    pub fn new(creds: GoogleCredentials, store: FileStore) -> Self {
        GoogleCalendarSource { creds, store }
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendarSource {
    async fn upcoming_events(&self, user_id: &str) -> CallbellResult<Vec<UpcomingEvent>> {
        let Some(access_token) =
            tokens::valid_access_token(&self.store, &self.creds, user_id).await?
        else {
            return Ok(Vec::new());
        };

        let client = Client::new(
            self.creds.client_id.clone(),
            self.creds.client_secret.clone(),
            String::new(),
            access_token,
            String::new(),
        );

        let time_min = Utc::now();
        let time_max = time_min + Duration::minutes(LOOK_AHEAD_MINUTES);

        let response = tokio::time::timeout(
            std::time::Duration::from_secs(FETCH_TIMEOUT_SECS),
            client.events().list_all(
                "primary",
                "",
                0,
                OrderBy::default(),
                &[],
                "", // search query
                &[],
                false,
                false,
                true, // expand recurring events into single instances
                &time_max.to_rfc3339(),
                &time_min.to_rfc3339(),
                "",
                "",
            ),
        )
        .await
        .map_err(|_| CallbellError::Timeout("event listing", FETCH_TIMEOUT_SECS))?
        .map_err(|e| CallbellError::Calendar(format!("Failed to fetch events: {e}")))?;

        let mut events: Vec<UpcomingEvent> = response
            .body
            .into_iter()
            .filter_map(normalize_event)
            .collect();
        events.sort_by_key(|e| e.start);

        Ok(events)
    }
}

/// Normalize one raw Google event into an [`UpcomingEvent`].
///
/// Returns `None` for events the reminder cycle must ignore: all-day
/// events (date only, no timestamp), cancelled events, and events without
/// a provider-assigned id.
pub fn normalize_event(event: google_calendar::types::Event) -> Option<UpcomingEvent> {
    if event.id.is_empty() || event.status == "cancelled" {
        return None;
    }

    let start_field = event.start?;
    let start = start_field.date_time?;

    let end = event
        .end
        .as_ref()
        .and_then(|e| e.date_time)
        .unwrap_or(start);

    let summary = if event.summary.is_empty() {
        "Untitled event".to_string()
    } else {
        event.summary
    };

    Some(UpcomingEvent {
        id: event.id,
        summary,
        start,
        end,
        time_zone: resolve_zone(&start_field.time_zone),
        html_link: (!event.html_link.is_empty()).then_some(event.html_link),
    })
}

/// The event's own start zone when present, the host zone as fallback,
/// UTC as the last rung.
fn resolve_zone(event_zone: &str) -> Tz {
    if let Ok(tz) = event_zone.parse::<Tz>() {
        return tz;
    }
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(chrono_tz::UTC)
}
