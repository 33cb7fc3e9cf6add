use std::sync::Arc;
use std::time::Duration;

use ca_core::{AppConfig, ArticleRecord, EnrichedArticle, FeedEntry, Result};
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::extract::{ExtractArticle, HttpArticleExtractor};
use crate::feed::{FetchEntries, HttpFeedReader};

const USER_AGENT: &str = concat!("ca-notes/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Walks the configured feed sources, extracts every entry, and keeps
/// only articles that produced body text, each tagged with its feed
/// entry's metadata.
#[derive(Clone)]
pub struct Aggregator {
    reader: Arc<dyn FetchEntries>,
    extractor: Arc<dyn ExtractArticle>,
    feeds: Vec<String>,
    per_feed_limit: usize,
    concurrency: usize,
}

impl Aggregator {
    pub fn new(
        config: &AppConfig,
        reader: Arc<dyn FetchEntries>,
        extractor: Arc<dyn ExtractArticle>,
    ) -> Self {
        Self {
            reader,
            extractor,
            feeds: config.feeds.clone(),
            per_feed_limit: config.per_feed_limit,
            concurrency: config.extract_concurrency.max(1),
        }
    }

    /// Build the network-backed aggregator sharing one HTTP client
    /// between the feed reader and the article extractor.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self::new(
            config,
            Arc::new(HttpFeedReader::new(client.clone())),
            Arc::new(HttpArticleExtractor::new(client)),
        ))
    }

    /// Pull entries from every feed, extract each linked article, and
    /// return the surviving articles in feed order. Feed and article
    /// failures are absorbed here; this never errors.
    pub async fn aggregate(&self) -> Vec<EnrichedArticle> {
        let mut entries: Vec<FeedEntry> = Vec::new();
        for feed_url in &self.feeds {
            entries.extend(self.reader.fetch(feed_url, self.per_feed_limit).await);
        }
        info!(entries = entries.len(), feeds = self.feeds.len(), "collected feed entries");

        // `buffered` preserves input order, so tie-breaking downstream
        // stays deterministic regardless of completion order.
        let records: Vec<(FeedEntry, ArticleRecord)> = stream::iter(entries)
            .map(|entry| {
                let extractor = Arc::clone(&self.extractor);
                async move {
                    let record = extractor.extract(&entry.link).await;
                    (entry, record)
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut enriched = Vec::new();
        for (entry, record) in records {
            match record {
                ArticleRecord::Extracted(content) if !content.text.is_empty() => {
                    enriched.push(EnrichedArticle {
                        article: content,
                        feed_title: entry.title,
                        feed_published: entry.published,
                    });
                }
                ArticleRecord::Extracted(content) => {
                    debug!(url = %content.url, "article had no extractable text; dropping");
                }
                ArticleRecord::Failed { url, error } => {
                    debug!(url = %url, error = %error, "article extraction failed; dropping");
                }
            }
        }
        info!(kept = enriched.len(), "aggregation complete");
        enriched
    }
}
