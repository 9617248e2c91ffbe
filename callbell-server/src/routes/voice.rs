//! TwiML webhook fallback.
//!
//! The dialer sends TwiML inline with the call request; this route serves
//! the same script for deployments that point Twilio at a callback URL
//! instead. Twilio may fetch it with GET or POST.

use axum::{
    Router,
    extract::Query,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use callbell_provider_twilio::twiml;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/twilio/voice", get(voice).post(voice))
}

#[derive(Deserialize)]
pub struct VoiceQuery {
    pub summary: Option<String>,
    pub start: Option<String>,
    pub tz: Option<String>,
}

/// GET|POST /twilio/voice?summary=&start=&tz= - The spoken reminder script.
async fn voice(Query(query): Query<VoiceQuery>) -> Response {
    let summary = query.summary.as_deref().unwrap_or("Your calendar event");

    let zone: Tz = query
        .tz
        .as_deref()
        .and_then(|t| t.parse().ok())
        .unwrap_or(chrono_tz::UTC);

    let start = query
        .start
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let body = twiml::reminder_twiml(summary, start, zone);
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}
