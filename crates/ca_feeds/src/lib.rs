pub mod aggregate;
pub mod extract;
pub mod feed;
pub mod rank;

pub use aggregate::Aggregator;
pub use extract::{parse_article, ExtractArticle, HttpArticleExtractor};
pub use feed::{FetchEntries, HttpFeedReader};
pub use rank::{clamp_count, select_top};

pub mod prelude {
    pub use super::{Aggregator, ExtractArticle, FetchEntries};
    pub use ca_core::{ArticleRecord, EnrichedArticle, FeedEntry, Result};
}
