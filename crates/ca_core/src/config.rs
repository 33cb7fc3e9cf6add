use std::env;

pub const DEFAULT_OLLAMA_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";

/// The fixed feed sources the aggregator pulls from. Not configurable
/// through the API.
pub const DEFAULT_FEEDS: [&str; 5] = [
    "https://feeds.bbci.co.uk/news/rss.xml",
    "https://www.thehindu.com/news/national/feeder/default.rss",
    "https://indianexpress.com/section/india/feed/",
    "https://www.livemint.com/rss/news",
    "https://www.business-standard.com/rss/latest.rss",
];

/// Process-wide configuration, resolved once at startup and threaded
/// into the pipeline components by value. Nothing reads the
/// environment after construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Ollama generation service.
    pub ollama_host: String,
    pub feeds: Vec<String>,
    /// Entries pulled per feed before extraction.
    pub per_feed_limit: usize,
    /// Upper bound on in-flight article extractions.
    pub extract_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            per_feed_limit: 5,
            extract_concurrency: 8,
        }
    }
}

impl AppConfig {
    /// Read `OLLAMA_HOST` from the environment, falling back to the
    /// local default. Called exactly once at process start.
    pub fn from_env() -> Self {
        let ollama_host =
            env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());
        Self {
            ollama_host,
            ..Self::default()
        }
    }

    pub fn with_ollama_host(mut self, host: impl Into<String>) -> Self {
        self.ollama_host = host.into();
        self
    }
}
