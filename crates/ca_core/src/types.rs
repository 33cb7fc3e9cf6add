use serde::{Deserialize, Serialize};

/// A single entry pulled from an RSS/Atom feed. `published` keeps the
/// feed's free-form date text as-is; missing fields default to "".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published: String,
}

/// The extracted body of one article. `publish_date` is an ISO-8601
/// date (`YYYY-MM-DD`) when the page carries one, otherwise "".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleContent {
    pub title: String,
    pub authors: Vec<String>,
    pub publish_date: String,
    pub text: String,
    pub url: String,
}

/// Outcome of extracting one URL. Extraction never surfaces an `Err`
/// to the caller: every failure collapses into `Failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleRecord {
    Extracted(ArticleContent),
    Failed { url: String, error: String },
}

impl ArticleRecord {
    pub fn url(&self) -> &str {
        match self {
            ArticleRecord::Extracted(content) => &content.url,
            ArticleRecord::Failed { url, .. } => url,
        }
    }

    /// True only for a successful extraction that produced body text.
    pub fn has_text(&self) -> bool {
        matches!(self, ArticleRecord::Extracted(content) if !content.text.is_empty())
    }

    pub fn into_content(self) -> Option<ArticleContent> {
        match self {
            ArticleRecord::Extracted(content) => Some(content),
            ArticleRecord::Failed { .. } => None,
        }
    }
}

/// A successfully extracted article together with the metadata of the
/// feed entry it came from. Only built when `article.text` is
/// non-empty; this is the unit the ranker orders and the note
/// generator consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedArticle {
    #[serde(flatten)]
    pub article: ArticleContent,
    pub feed_title: String,
    pub feed_published: String,
}

impl EnrichedArticle {
    /// The date shown on the note's source line: the page's own
    /// publish date when present, else the feed entry's date text.
    pub fn source_date(&self) -> &str {
        if !self.article.publish_date.is_empty() {
            &self.article.publish_date
        } else {
            &self.feed_published
        }
    }
}

/// One block of generated text following the fixed note template.
pub type Note = String;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_has_text_only_for_non_empty_extraction() {
        let full = ArticleRecord::Extracted(ArticleContent {
            text: "body".to_string(),
            url: "http://x/1".to_string(),
            ..Default::default()
        });
        let empty = ArticleRecord::Extracted(ArticleContent {
            url: "http://x/2".to_string(),
            ..Default::default()
        });
        let failed = ArticleRecord::Failed {
            url: "http://x/3".to_string(),
            error: "timeout".to_string(),
        };

        assert!(full.has_text());
        assert!(!empty.has_text());
        assert!(!failed.has_text());
        assert_eq!(failed.url(), "http://x/3");
    }

    #[test]
    fn source_date_prefers_publish_date() {
        let mut enriched = EnrichedArticle {
            article: ArticleContent {
                publish_date: "2024-02-01".to_string(),
                ..Default::default()
            },
            feed_title: "Feed".to_string(),
            feed_published: "Thu, 01 Feb 2024 09:00:00 GMT".to_string(),
        };
        assert_eq!(enriched.source_date(), "2024-02-01");

        enriched.article.publish_date.clear();
        assert_eq!(enriched.source_date(), "Thu, 01 Feb 2024 09:00:00 GMT");
    }
}
