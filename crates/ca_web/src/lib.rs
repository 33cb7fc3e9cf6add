use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::root))
        .route("/daily", get(handlers::daily))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{create_app, AppState};
    pub use ca_core::{AppConfig, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use ca_core::{AppConfig, ArticleContent, ArticleRecord, FeedEntry};
    use ca_feeds::{Aggregator, ExtractArticle, FetchEntries};
    use ca_inference::MockModel;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FakeReader {
        entries: Vec<FeedEntry>,
    }

    #[async_trait]
    impl FetchEntries for FakeReader {
        async fn fetch(&self, _feed_url: &str, limit: usize) -> Vec<FeedEntry> {
            let mut entries = self.entries.clone();
            entries.truncate(limit);
            entries
        }
    }

    struct FakeExtractor {
        records: HashMap<String, ArticleRecord>,
    }

    #[async_trait]
    impl ExtractArticle for FakeExtractor {
        async fn extract(&self, url: &str) -> ArticleRecord {
            self.records
                .get(url)
                .cloned()
                .unwrap_or(ArticleRecord::Failed {
                    url: url.to_string(),
                    error: "connection refused".to_string(),
                })
        }
    }

    fn entry(title: &str, link: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: link.to_string(),
            published: "Thu, 01 Feb 2024 09:00:00 GMT".to_string(),
        }
    }

    /// One feed with one extractable article and three dead links.
    fn pipeline_state(model: MockModel) -> AppState {
        let config = AppConfig {
            feeds: vec!["http://feed/rss".to_string()],
            ..AppConfig::default()
        };
        let reader = FakeReader {
            entries: vec![
                entry("good", "http://a/1"),
                entry("dead1", "http://a/2"),
                entry("dead2", "http://a/3"),
                entry("dead3", "http://a/4"),
            ],
        };
        let extractor = FakeExtractor {
            records: HashMap::from([(
                "http://a/1".to_string(),
                ArticleRecord::Extracted(ArticleContent {
                    title: "Budget 2024".to_string(),
                    text: "x".repeat(1200),
                    url: "http://a/1".to_string(),
                    ..Default::default()
                }),
            )]),
        };

        AppState {
            aggregator: Aggregator::new(&config, Arc::new(reader), Arc::new(extractor)),
            model: Arc::new(model),
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_static_ok() {
        let app = create_app(pipeline_state(MockModel::new("unused")));
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn root_returns_info_message() {
        let app = create_app(pipeline_state(MockModel::new("unused")));
        let (status, body) = get_json(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("UPSC Current Affairs API"));
    }

    #[tokio::test]
    async fn daily_returns_one_note_when_one_article_survives() {
        let app = create_app(pipeline_state(MockModel::new("generated note")));
        let (status, body) = get_json(app, "/daily?n=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["notes"], serde_json::json!(["generated note"]));
    }

    #[tokio::test]
    async fn daily_defaults_apply_without_params() {
        let app = create_app(pipeline_state(MockModel::new("note")));
        let (status, body) = get_json(app, "/daily").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn generation_failure_fails_the_whole_request() {
        let app = create_app(pipeline_state(MockModel::failing()));
        let (status, body) = get_json(app, "/daily?n=3").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("generation"));
    }
}
