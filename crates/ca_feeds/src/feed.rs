use async_trait::async_trait;
use ca_core::FeedEntry;
use feed_rs::model::Feed;
use feed_rs::parser;
use reqwest::Client;
use tracing::{debug, warn};

/// Source of feed entries. The aggregator only sees this trait, so
/// tests can substitute a fake for the network-backed reader.
#[async_trait]
pub trait FetchEntries: Send + Sync {
    /// Returns at most `limit` entries in the feed's native order.
    /// A failing or malformed feed yields an empty list, never an
    /// error.
    async fn fetch(&self, feed_url: &str, limit: usize) -> Vec<FeedEntry>;
}

pub struct HttpFeedReader {
    client: Client,
}

impl HttpFeedReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchEntries for HttpFeedReader {
    async fn fetch(&self, feed_url: &str, limit: usize) -> Vec<FeedEntry> {
        let bytes = match self
            .client
            .get(feed_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
        {
            Ok(response) => match response.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(feed = %feed_url, error = %e, "failed to read feed body; skipping feed");
                    return Vec::new();
                }
            },
            Err(e) => {
                warn!(feed = %feed_url, error = %e, "failed to fetch feed; skipping feed");
                return Vec::new();
            }
        };

        let entries = parse_feed_bytes(&bytes, feed_url, limit);
        debug!(feed = %feed_url, count = entries.len(), "fetched feed entries");
        entries
    }
}

/// Parse raw feed bytes into entries, absorbing parse failures into an
/// empty list.
pub fn parse_feed_bytes(bytes: &[u8], feed_url: &str, limit: usize) -> Vec<FeedEntry> {
    match parser::parse(bytes) {
        Ok(feed) => entries_from_feed(feed, limit),
        Err(e) => {
            warn!(feed = %feed_url, error = %e, "failed to parse feed; skipping feed");
            Vec::new()
        }
    }
}

/// Convert a parsed feed into at most `limit` entries, preserving the
/// feed's own ordering. Missing fields default to "".
pub fn entries_from_feed(feed: Feed, limit: usize) -> Vec<FeedEntry> {
    feed.entries
        .into_iter()
        .take(limit)
        .map(|entry| FeedEntry {
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            link: entry
                .links
                .first()
                .map(|link| link.href.clone())
                .unwrap_or_default(),
            published: entry
                .published
                .map(|dt| dt.to_rfc2822())
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Channel</title>
    <link>http://example.com</link>
    <item>
      <title>First story</title>
      <link>http://example.com/1</link>
      <pubDate>Thu, 01 Feb 2024 09:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Second story</title>
      <link>http://example.com/2</link>
    </item>
    <item>
      <link>http://example.com/3</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn entries_respect_limit_and_order() {
        let entries = parse_feed_bytes(RSS_FIXTURE.as_bytes(), "http://example.com/rss", 2);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First story");
        assert_eq!(entries[0].link, "http://example.com/1");
        assert_eq!(entries[1].title, "Second story");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let entries = parse_feed_bytes(RSS_FIXTURE.as_bytes(), "http://example.com/rss", 5);
        assert_eq!(entries.len(), 3);
        assert!(entries[0].published.contains("2024"));
        assert_eq!(entries[1].published, "");
        assert_eq!(entries[2].title, "");
        assert_eq!(entries[2].link, "http://example.com/3");
    }

    #[test]
    fn malformed_feed_yields_empty_list() {
        let entries = parse_feed_bytes(b"this is not xml at all", "http://example.com/rss", 5);
        assert!(entries.is_empty());
    }
}
