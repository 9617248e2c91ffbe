//! Phone-number management.
//!
//! Identity comes from the excluded front-end subsystem; these routes
//! trust the supplied user id and only enforce number shape.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use callbell_core::phone::{is_valid_e164, normalize_phone};

use crate::routes::{AppError, ErrorResponse, UserQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/user/phone", get(get_phone).put(set_phone))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPhoneRequest {
    pub user_id: String,
    pub phone_number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneResponse {
    pub phone_number: Option<String>,
}

/// GET /user/phone?userId= - The user's stored phone number, if any.
async fn get_phone(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<PhoneResponse>, AppError> {
    let phone_number = state.store.user_phone(&query.user_id)?;
    Ok(Json(PhoneResponse { phone_number }))
}

/// PUT /user/phone - Set the user's phone number, normalized to E.164.
async fn set_phone(
    State(state): State<AppState>,
    Json(req): Json<SetPhoneRequest>,
) -> Result<Response, AppError> {
    let normalized = normalize_phone(&req.phone_number);
    if !is_valid_e164(&normalized) {
        let body = Json(ErrorResponse {
            error: "Phone number must be in E.164 format (e.g. +1234567890)".to_string(),
        });
        return Ok((StatusCode::BAD_REQUEST, body).into_response());
    }

    state.store.set_user_phone(&req.user_id, &normalized)?;

    let body = Json(PhoneResponse {
        phone_number: Some(normalized),
    });
    Ok(body.into_response())
}
