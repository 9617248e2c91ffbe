//! Stored OAuth tokens for one user's calendar account.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh token pair for a linked calendar account.
///
/// Created at account linking (outside this core), mutated only when a
/// refresh exchange succeeds, never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenData {
    /// Build a record from a token response, converting the provider's
    /// `expires_in` seconds into an absolute expiry.
    pub fn from_tokens(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
    ) -> Self {
        let expires_at = (expires_in > 0).then(|| Utc::now() + Duration::seconds(expires_in));
        TokenData {
            access_token,
            refresh_token,
            expires_at,
        }
    }
}
