use async_trait::async_trait;
use ca_core::{ArticleContent, ArticleRecord};
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Turns a URL into an [`ArticleRecord`]. Implementations must never
/// return an error: network and parse failures collapse into
/// `ArticleRecord::Failed`.
#[async_trait]
pub trait ExtractArticle: Send + Sync {
    async fn extract(&self, url: &str) -> ArticleRecord;
}

pub struct HttpArticleExtractor {
    client: Client,
}

impl HttpArticleExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExtractArticle for HttpArticleExtractor {
    async fn extract(&self, url: &str) -> ArticleRecord {
        if let Err(e) = Url::parse(url) {
            return ArticleRecord::Failed {
                url: url.to_string(),
                error: format!("invalid url: {}", e),
            };
        }

        let html = match self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
        {
            Ok(response) => match response.text().await {
                Ok(html) => html,
                Err(e) => {
                    return ArticleRecord::Failed {
                        url: url.to_string(),
                        error: e.to_string(),
                    }
                }
            },
            Err(e) => {
                return ArticleRecord::Failed {
                    url: url.to_string(),
                    error: e.to_string(),
                }
            }
        };

        debug!(url = %url, bytes = html.len(), "downloaded article page");
        ArticleRecord::Extracted(parse_article(&html, url))
    }
}

/// Isolate title, authors, publish date and body text from a page.
/// Pure over the HTML string so it can be tested without network.
pub fn parse_article(html: &str, url: &str) -> ArticleContent {
    let document = Html::parse_document(html);
    let meta = jsonld_metadata(&document);

    let title = meta
        .headline
        .or_else(|| meta_content(&document, "meta[property='og:title']"))
        .or_else(|| first_text(&document, "h1"))
        .or_else(|| first_text(&document, "title"))
        .unwrap_or_default();

    let authors = if !meta.authors.is_empty() {
        meta.authors
    } else {
        meta_content(&document, "meta[name='author']")
            .map(|name| vec![name])
            .unwrap_or_default()
    };

    let publish_date = meta
        .date_published
        .or_else(|| meta_content(&document, "meta[property='article:published_time']"))
        .map(|raw| normalize_date(&raw))
        .unwrap_or_default();

    ArticleContent {
        title,
        authors,
        publish_date,
        text: body_text(&document),
        url: url.to_string(),
    }
}

/// Main body text: paragraphs inside `<article>`, falling back to all
/// `<p>` elements, joined by blank lines.
fn body_text(document: &Html) -> String {
    let article_paragraphs = Selector::parse("article p").unwrap();
    let any_paragraphs = Selector::parse("p").unwrap();

    let collect = |selector: &Selector| {
        document
            .select(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
    };

    let mut paragraphs = collect(&article_paragraphs);
    if paragraphs.is_empty() {
        paragraphs = collect(&any_paragraphs);
    }
    paragraphs.join("\n\n")
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reduce a timestamp string to an ISO-8601 date, or "" when it is not
/// recognizable.
fn normalize_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Some(prefix) = raw.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    String::new()
}

#[derive(Default)]
struct JsonLdMetadata {
    headline: Option<String>,
    date_published: Option<String>,
    authors: Vec<String>,
}

/// Pull article metadata out of `application/ld+json` blocks. News
/// pages usually carry a NewsArticle object, either at the top level
/// or inside an array.
fn jsonld_metadata(document: &Html) -> JsonLdMetadata {
    let mut meta = JsonLdMetadata::default();
    let selector = Selector::parse("script[type='application/ld+json']").unwrap();

    for script in document.select(&selector) {
        let raw = script.text().collect::<String>();
        let Ok(json) = serde_json::from_str::<serde_json::Value>(raw.trim()) else {
            continue;
        };

        let objects: Vec<&serde_json::Value> = match &json {
            serde_json::Value::Array(arr) => arr.iter().collect(),
            other => vec![other],
        };

        for obj in objects {
            if meta.headline.is_none() {
                meta.headline = obj
                    .get("headline")
                    .and_then(|h| h.as_str())
                    .map(|s| s.trim().to_string());
            }
            if meta.date_published.is_none() {
                meta.date_published = obj
                    .get("datePublished")
                    .and_then(|d| d.as_str())
                    .map(|s| s.trim().to_string());
            }
            if meta.authors.is_empty() {
                if let Some(author) = obj.get("author") {
                    meta.authors = author_names(author);
                }
            }
        }
    }
    meta
}

fn author_names(author: &serde_json::Value) -> Vec<String> {
    match author {
        serde_json::Value::Array(arr) => arr
            .iter()
            .filter_map(|a| a.get("name").and_then(|n| n.as_str()))
            .map(|name| name.trim().to_string())
            .collect(),
        serde_json::Value::Object(obj) => obj
            .get("name")
            .and_then(|n| n.as_str())
            .map(|name| vec![name.trim().to_string()])
            .unwrap_or_default(),
        serde_json::Value::String(s) => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}
