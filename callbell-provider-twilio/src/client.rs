//! Twilio REST client for outbound calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use callbell_core::{CallDialer, CallbellError, CallbellResult, UpcomingEvent};

use crate::twiml;

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// How long Twilio lets the callee's phone ring before giving up.
const ANSWER_TIMEOUT_SECS: u32 = 30;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Twilio account credentials and the caller-id number.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// E.164 number calls are placed from.
    pub from_number: String,
}

/// Twilio implementation of [`CallDialer`].
pub struct TwilioDialer {
    config: TwilioConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    sid: String,
}

impl TwilioDialer {
    pub fn new(config: TwilioConfig) -> CallbellResult<Self> {
        if config.account_sid.is_empty()
            || config.auth_token.is_empty()
            || config.from_number.is_empty()
        {
            return Err(CallbellError::Config(
                "Twilio credentials not configured".into(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CallbellError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(TwilioDialer { config, client })
    }
}

#[async_trait]
impl CallDialer for TwilioDialer {
    async fn place_call(&self, to: &str, event: &UpcomingEvent) -> CallbellResult<String> {
        let url = format!(
            "{API_BASE}/Accounts/{}/Calls.json",
            self.config.account_sid
        );
        let script = twiml::reminder_twiml(&event.summary, event.start, event.time_zone);
        let answer_timeout = ANSWER_TIMEOUT_SECS.to_string();

        let params = [
            ("To", to),
            ("From", self.config.from_number.as_str()),
            ("Twiml", script.as_str()),
            ("Timeout", answer_timeout.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| CallbellError::Dispatch(format!("Twilio request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            // Body only: Twilio's error JSON names the problem without
            // echoing credentials.
            let body = response.text().await.unwrap_or_default();
            return Err(CallbellError::Dispatch(format!(
                "Twilio returned {status}: {body}"
            )));
        }

        let call: CallResponse = response
            .json()
            .await
            .map_err(|e| CallbellError::Dispatch(format!("Failed to parse Twilio response: {e}")))?;

        info!(call = %call.sid, "outbound call created");
        Ok(call.sid)
    }
}
