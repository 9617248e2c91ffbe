//! Scheduler-triggered reminder cycle.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use callbell_core::cycle;

use crate::routes::{AppError, ErrorResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/cron/check-events", get(check_events))
}

/// GET /cron/check-events - Run one reminder-dispatch cycle.
///
/// Requires `Authorization: Bearer <cron_secret>`. On mismatch nothing
/// runs and nothing is written. The scheduler's interval must be at most
/// the five-minute look-ahead window or events can slip through unseen.
async fn check_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !authorized(presented, &state.config.cron_secret) {
        let body = Json(ErrorResponse {
            error: "Unauthorized".to_string(),
        });
        return Ok((StatusCode::UNAUTHORIZED, body).into_response());
    }

    let report = cycle::run_cycle(
        &state.store,
        state.calendar.as_ref(),
        state.dialer.as_ref(),
    )
    .await?;

    Ok(Json(report).into_response())
}

/// Byte-for-byte comparison against the configured bearer secret.
/// An empty configured secret never authorizes anything.
fn authorized(header_value: &str, secret: &str) -> bool {
    !secret.is_empty() && header_value == format!("Bearer {secret}")
}

#[cfg(test)]
mod tests {
    use super::authorized;

    #[test]
    fn accepts_the_exact_bearer_token() {
        assert!(authorized("Bearer s3cret", "s3cret"));
    }

    #[test]
    fn rejects_wrong_or_malformed_headers() {
        assert!(!authorized("", "s3cret"));
        assert!(!authorized("s3cret", "s3cret"));
        assert!(!authorized("Bearer wrong", "s3cret"));
        assert!(!authorized("Bearer s3cret ", "s3cret"));
        assert!(!authorized("bearer s3cret", "s3cret"));
    }

    #[test]
    fn empty_secret_authorizes_nothing() {
        assert!(!authorized("Bearer ", ""));
        assert!(!authorized("", ""));
    }
}
