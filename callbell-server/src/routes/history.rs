//! Reminder call history.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::routes::{AppError, UserQuery};
use crate::state::AppState;

/// Display cap; the ledger itself is append-only and unbounded.
const HISTORY_LIMIT: usize = 20;

pub fn router() -> Router<AppState> {
    Router::new().route("/reminders/history", get(history))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderEntry {
    pub id: String,
    pub event_id: String,
    pub event_start_at: DateTime<Utc>,
    pub called_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub reminders: Vec<ReminderEntry>,
}

/// GET /reminders/history?userId= - Latest reminder calls, newest first.
async fn history(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let reminders = state
        .store
        .recent_reminders(&query.user_id, HISTORY_LIMIT)?
        .into_iter()
        .map(|r| ReminderEntry {
            id: r.id,
            event_id: r.event_id,
            event_start_at: r.start_at,
            called_at: r.called_at,
        })
        .collect();

    Ok(Json(HistoryResponse { reminders }))
}
