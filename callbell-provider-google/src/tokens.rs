//! Access-token lifecycle: load, refresh near expiry, persist.

use chrono::{DateTime, Duration, Utc};
use google_calendar::Client;
use tokio::time::timeout;
use tracing::warn;

use callbell_core::{CallbellError, CallbellResult, FileStore, TokenData};

use crate::GoogleCredentials;

/// Refresh when less than this much life remains on the access token,
/// so a token that would expire mid-cycle is exchanged up front.
const REFRESH_MARGIN_SECS: i64 = 300;

const REFRESH_TIMEOUT_SECS: u64 = 30;

/// Whether the stored token is close enough to expiry to warrant a
/// refresh exchange. Tokens without a recorded expiry are used as-is.
fn needs_refresh(tokens: &TokenData, now: DateTime<Utc>) -> bool {
    match tokens.expires_at {
        Some(expires_at) => expires_at - now <= Duration::seconds(REFRESH_MARGIN_SECS),
        None => false,
    }
}

/// Return a currently-valid access token for the user, or `None` when the
/// account is not linked or cannot be refreshed.
///
/// Refresh failures are logged and swallowed: one user's revoked grant
/// must never abort a whole cycle.
pub async fn valid_access_token(
    store: &FileStore,
    creds: &GoogleCredentials,
    user_id: &str,
) -> CallbellResult<Option<String>> {
    let Some(tokens) = store.credential(user_id)? else {
        return Ok(None);
    };

    let now = Utc::now();
    if !needs_refresh(&tokens, now) {
        return Ok(Some(tokens.access_token));
    }

    if tokens.refresh_token.is_none() {
        // Inside the margin with no way to refresh: the token is still
        // usable until it actually expires.
        if tokens.expires_at.is_some_and(|t| t > now) {
            return Ok(Some(tokens.access_token));
        }
        return Ok(None);
    }

    match refresh_exchange(creds, &tokens).await {
        Ok(refreshed) => {
            store.save_credential(user_id, &refreshed)?;
            Ok(Some(refreshed.access_token))
        }
        Err(err) => {
            warn!(user = %user_id, "token refresh failed: {err}");
            Ok(None)
        }
    }
}

async fn refresh_exchange(
    creds: &GoogleCredentials,
    tokens: &TokenData,
) -> CallbellResult<TokenData> {
    let client = Client::new(
        creds.client_id.clone(),
        creds.client_secret.clone(),
        String::new(),
        tokens.access_token.clone(),
        tokens.refresh_token.clone().unwrap_or_default(),
    );

    let refreshed = timeout(
        std::time::Duration::from_secs(REFRESH_TIMEOUT_SECS),
        client.refresh_access_token(),
    )
    .await
    .map_err(|_| CallbellError::Timeout("token refresh", REFRESH_TIMEOUT_SECS))?
    .map_err(|e| CallbellError::Calendar(format!("Failed to refresh token: {e}")))?;

    // Google typically doesn't return a new refresh_token on refresh
    let refresh_token = if refreshed.refresh_token.is_empty() {
        tokens.refresh_token.clone()
    } else {
        Some(refreshed.refresh_token)
    };

    Ok(TokenData::from_tokens(
        refreshed.access_token,
        refresh_token,
        refreshed.expires_in,
    ))
}
