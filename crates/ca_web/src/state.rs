use std::sync::Arc;

use ca_core::{AppConfig, Result};
use ca_feeds::Aggregator;
use ca_inference::{NoteModel, OllamaClient};

/// Everything a request handler needs. Built once at startup; holds
/// no mutable state, so concurrent requests simply share it.
pub struct AppState {
    pub aggregator: Aggregator,
    pub model: Arc<dyn NoteModel>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            aggregator: Aggregator::from_config(config)?,
            model: Arc::new(OllamaClient::new(config.ollama_host.clone())?),
        })
    }
}
