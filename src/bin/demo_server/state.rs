//! Application state for the demo server

use huobi_sdk::{Client, ClientOptions};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<Client>,
}

impl AppState {
    /// Build the SDK client from `HUOBI_*` environment variables
    pub fn from_env() -> huobi_sdk::Result<Self> {
        let client = Client::new(ClientOptions::from_env())?;
        if client.has_credentials() {
            tracing::info!("API credentials loaded, account routes enabled");
        } else {
            tracing::warn!("no API credentials, account routes will answer 401");
        }

        Ok(Self {
            client: Arc::new(client),
        })
    }
}
