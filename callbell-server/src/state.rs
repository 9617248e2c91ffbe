use std::sync::Arc;

use anyhow::Result;

use callbell_core::{CalendarSource, CallDialer, FileStore};
use callbell_provider_google::GoogleCalendarSource;
use callbell_provider_twilio::TwilioDialer;

use crate::config::ServerConfig;

/// Shared application state: config, the file store, and the provider
/// clients behind their trait objects.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: FileStore,
    pub calendar: Arc<dyn CalendarSource>,
    pub dialer: Arc<dyn CallDialer>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let data_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => callbell_core::store::default_data_dir()?,
        };
        let store = FileStore::new(data_dir);

        let calendar = GoogleCalendarSource::new(config.google.clone(), store.clone());
        let dialer = TwilioDialer::new(config.twilio.clone())?;

        Ok(AppState {
            config: Arc::new(config),
            store,
            calendar: Arc::new(calendar),
            dialer: Arc::new(dialer),
        })
    }
}
