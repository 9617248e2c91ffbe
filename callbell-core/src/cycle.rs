//! The reminder-dispatch cycle.
//!
//! One invocation walks every user with a phone number, fetches their
//! events in the look-ahead window, and places a call for each event the
//! ledger has not seen. Failures are isolated: a broken user or event is
//! reported in the results and the cycle moves on.
//!
//! The call is placed before the ledger write. Under overlapping
//! invocations that ordering allows at most one duplicate call per
//! composite key; recording first would instead risk a silent missed call
//! on a crash between the two steps.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{CallbellError, CallbellResult};
use crate::providers::{CalendarSource, CallDialer};
use crate::store::{FileStore, UserWithPhone};

/// Per-user outcome of one cycle run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCycleResult {
    pub user_id: String,
    pub events_found: usize,
    pub calls_placed: usize,
    pub skipped_duplicate: usize,
    pub errors: Vec<String>,
}

/// Aggregate outcome of one cycle run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub ok: bool,
    pub users_checked: usize,
    pub total_calls: usize,
    pub duration_ms: u64,
    pub results: Vec<UserCycleResult>,
}

/// Run one reminder-dispatch cycle across all eligible users.
pub async fn run_cycle(
    store: &FileStore,
    calendar: &dyn CalendarSource,
    dialer: &dyn CallDialer,
) -> CallbellResult<CycleReport> {
    let started = Instant::now();
    let users = store.users_with_phone()?;

    info!(users = users.len(), "reminder cycle starting");

    let mut results = Vec::with_capacity(users.len());
    let mut total_calls = 0;

    for user in &users {
        let result = process_user(store, calendar, dialer, user).await;
        total_calls += result.calls_placed;
        results.push(result);
    }

    let report = CycleReport {
        ok: true,
        users_checked: users.len(),
        total_calls,
        duration_ms: started.elapsed().as_millis() as u64,
        results,
    };

    info!(
        users = report.users_checked,
        calls = report.total_calls,
        duration_ms = report.duration_ms,
        "reminder cycle complete"
    );

    Ok(report)
}

async fn process_user(
    store: &FileStore,
    calendar: &dyn CalendarSource,
    dialer: &dyn CallDialer,
    user: &UserWithPhone,
) -> UserCycleResult {
    let mut calls_placed = 0;
    let mut skipped_duplicate = 0;
    let mut errors = Vec::new();

    let events = match calendar.upcoming_events(&user.user_id).await {
        Ok(events) => events,
        Err(err) => {
            warn!(user = %user.user_id, "event fetch failed: {err}");
            return UserCycleResult {
                user_id: user.user_id.clone(),
                events_found: 0,
                calls_placed: 0,
                skipped_duplicate: 0,
                errors: vec![err.to_string()],
            };
        }
    };

    for event in &events {
        if store.has_been_sent(&user.user_id, &event.id, &event.start) {
            skipped_duplicate += 1;
            continue;
        }

        let call_id = match dialer.place_call(&user.phone_number, event).await {
            Ok(id) => id,
            Err(err) => {
                warn!(user = %user.user_id, event = %event.id, "call failed: {err}");
                errors.push(format!("Event \"{}\" ({}): {err}", event.summary, event.id));
                continue;
            }
        };

        match store.record_reminder(&user.user_id, &event.id, &event.start) {
            Ok(_) => {
                calls_placed += 1;
                info!(
                    user = %user.user_id,
                    event = %event.summary,
                    call = %call_id,
                    "reminder sent"
                );
            }
            // A concurrent run recorded this key first; its call covers
            // the reminder.
            Err(CallbellError::DuplicateReminder(_)) => skipped_duplicate += 1,
            Err(err) => {
                errors.push(format!("Event \"{}\" ({}): {err}", event.summary, event.id));
            }
        }
    }

    UserCycleResult {
        user_id: user.user_id.clone(),
        events_found: events.len(),
        calls_placed,
        skipped_duplicate,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use chrono_tz::Tz;

    use super::*;
    use crate::event::UpcomingEvent;

    fn event(id: &str, summary: &str) -> UpcomingEvent {
        let start = Utc::now() + Duration::minutes(2);
        UpcomingEvent {
            id: id.to_string(),
            summary: summary.to_string(),
            start,
            end: start + Duration::minutes(30),
            time_zone: "America/New_York".parse::<Tz>().unwrap(),
            html_link: None,
        }
    }

    struct FakeCalendar {
        events: HashMap<String, Vec<UpcomingEvent>>,
        failing_users: Vec<String>,
    }

    impl FakeCalendar {
        fn new() -> Self {
            FakeCalendar {
                events: HashMap::new(),
                failing_users: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl CalendarSource for FakeCalendar {
        async fn upcoming_events(&self, user_id: &str) -> CallbellResult<Vec<UpcomingEvent>> {
            if self.failing_users.iter().any(|u| u == user_id) {
                return Err(CallbellError::Calendar("provider returned 503".into()));
            }
            Ok(self.events.get(user_id).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct FakeDialer {
        calls: Mutex<Vec<(String, String)>>,
        failing_events: Vec<String>,
    }

    #[async_trait]
    impl CallDialer for FakeDialer {
        async fn place_call(&self, to: &str, event: &UpcomingEvent) -> CallbellResult<String> {
            if self.failing_events.iter().any(|id| id == &event.id) {
                return Err(CallbellError::Dispatch("carrier rejected the call".into()));
            }
            let mut calls = self.calls.lock().unwrap();
            calls.push((to.to_string(), event.id.clone()));
            Ok(format!("CA{:04}", calls.len()))
        }
    }

    fn store_with_user(user_id: &str, phone: &str) -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set_user_phone(user_id, phone).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn second_run_places_no_calls() {
        let (_dir, store) = store_with_user("alice", "+15551234567");
        let mut calendar = FakeCalendar::new();
        calendar
            .events
            .insert("alice".to_string(), vec![event("ev1", "Standup")]);
        let dialer = FakeDialer::default();

        let first = run_cycle(&store, &calendar, &dialer).await.unwrap();
        assert_eq!(first.users_checked, 1);
        assert_eq!(first.total_calls, 1);
        assert_eq!(first.results[0].calls_placed, 1);
        assert_eq!(first.results[0].skipped_duplicate, 0);

        let second = run_cycle(&store, &calendar, &dialer).await.unwrap();
        assert_eq!(second.total_calls, 0);
        assert_eq!(second.results[0].skipped_duplicate, 1);
        assert_eq!(second.results[0].calls_placed, 0);

        let calls = dialer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("+15551234567".to_string(), "ev1".to_string()));
    }

    #[tokio::test]
    async fn dispatch_failure_does_not_block_sibling_events() {
        let (_dir, store) = store_with_user("alice", "+15551234567");
        let mut calendar = FakeCalendar::new();
        calendar.events.insert(
            "alice".to_string(),
            vec![event("ev1", "Standup"), event("ev2", "Review")],
        );
        let dialer = FakeDialer {
            failing_events: vec!["ev2".to_string()],
            ..FakeDialer::default()
        };

        let report = run_cycle(&store, &calendar, &dialer).await.unwrap();
        let result = &report.results[0];
        assert_eq!(result.events_found, 2);
        assert_eq!(result.calls_placed, 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("ev2"));

        // No ledger entry for the failed event, so the next run retries it.
        assert!(store.has_been_sent("alice", "ev1", &calendar.events["alice"][0].start));
        assert!(!store.has_been_sent("alice", "ev2", &calendar.events["alice"][1].start));
    }

    #[tokio::test]
    async fn fetch_failure_is_one_error_entry_and_other_users_proceed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set_user_phone("alice", "+15551234567").unwrap();
        store.set_user_phone("bob", "+15557654321").unwrap();

        let mut calendar = FakeCalendar::new();
        calendar.failing_users.push("alice".to_string());
        calendar
            .events
            .insert("bob".to_string(), vec![event("ev9", "1:1")]);
        let dialer = FakeDialer::default();

        let report = run_cycle(&store, &calendar, &dialer).await.unwrap();
        assert_eq!(report.users_checked, 2);
        assert_eq!(report.total_calls, 1);

        let alice = &report.results[0];
        assert_eq!(alice.user_id, "alice");
        assert_eq!(alice.events_found, 0);
        assert_eq!(alice.errors.len(), 1);

        let bob = &report.results[1];
        assert_eq!(bob.calls_placed, 1);
        assert!(bob.errors.is_empty());
    }

    #[tokio::test]
    async fn users_without_phone_are_not_checked() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let mut calendar = FakeCalendar::new();
        calendar
            .events
            .insert("ghost".to_string(), vec![event("ev1", "Standup")]);
        let dialer = FakeDialer::default();

        let report = run_cycle(&store, &calendar, &dialer).await.unwrap();
        assert_eq!(report.users_checked, 0);
        assert_eq!(report.total_calls, 0);
        assert!(report.results.is_empty());
        assert!(dialer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn report_serializes_with_camel_case_keys() {
        let (_dir, store) = store_with_user("alice", "+15551234567");
        let calendar = FakeCalendar::new();
        let dialer = FakeDialer::default();

        let report = run_cycle(&store, &calendar, &dialer).await.unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["ok"], true);
        assert!(json.get("usersChecked").is_some());
        assert!(json.get("totalCalls").is_some());
        assert!(json.get("durationMs").is_some());
        assert!(json["results"][0].get("userId").is_some());
        assert!(json["results"][0].get("skippedDuplicate").is_some());
    }
}
