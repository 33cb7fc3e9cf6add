pub mod prompt;

use std::time::Duration;

use async_trait::async_trait;
use ca_core::{EnrichedArticle, Error, Note, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A single generation call may legitimately take minutes on local
/// hardware.
pub const GENERATE_TIMEOUT_SECS: u64 = 180;

/// Text-generation backend. The model identifier travels with every
/// call so a request-level override never touches shared state.
#[async_trait]
pub trait NoteModel: Send + Sync {
    fn name(&self) -> &str;

    /// Send a prompt and return the generated text. Unlike the feed
    /// and extraction layers, failures here propagate to the caller.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for Ollama's `/api/generate` endpoint.
pub struct OllamaClient {
    client: Client,
    host: String,
}

impl OllamaClient {
    pub fn new(host: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(GENERATE_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            host: host.into(),
        })
    }
}

#[async_trait]
impl NoteModel for OllamaClient {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        debug!(model, prompt_len = prompt.len(), host = %self.host, "sending generation request");
        let response = self
            .client
            .post(format!("{}/api/generate", self.host))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        Ok(response.response)
    }
}

/// Canned backend for tests and local development without a running
/// Ollama instance.
pub struct MockModel {
    reply: String,
    fail: bool,
}

impl MockModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fail: false,
        }
    }

    /// A backend whose every call fails, for exercising the
    /// propagate-to-caller path.
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl NoteModel for MockModel {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn generate(&self, _prompt: &str, model: &str) -> Result<String> {
        if self.fail {
            return Err(Error::Inference(format!(
                "mock generation failure (model {})",
                model
            )));
        }
        Ok(self.reply.clone())
    }
}

/// Build the prompt for one ranked article and run it through the
/// backend. Generation errors are not absorbed: a failed call fails
/// the whole batch.
pub async fn generate_note(
    model: &dyn NoteModel,
    article: &EnrichedArticle,
    model_name: &str,
) -> Result<Note> {
    let prompt = prompt::build_prompt(article);
    let note = model.generate(&prompt, model_name).await?;
    info!(url = %article.article.url, model = model_name, "generated note");
    Ok(note)
}
