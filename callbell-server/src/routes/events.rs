//! Upcoming-events endpoint for the dashboard.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Serialize;

use callbell_core::UpcomingEvent;

use crate::routes::{AppError, UserQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/calendar/events", get(list_events))
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<UpcomingEvent>,
}

/// GET /calendar/events?userId= - Events in the next five minutes.
///
/// Empty when the user has no linked calendar or no usable token.
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<EventsResponse>, AppError> {
    let events = state.calendar.upcoming_events(&query.user_id).await?;
    Ok(Json(EventsResponse { events }))
}
