use ca_core::EnrichedArticle;

/// Requested batch sizes are always forced into this window.
const MIN_SELECTED: i64 = 1;
const MAX_SELECTED: i64 = 10;

pub fn clamp_count(n: i64) -> usize {
    n.clamp(MIN_SELECTED, MAX_SELECTED) as usize
}

/// Rank aggregated articles by body length, longest first, and keep
/// the top `n` (clamped to [1, 10]). Text length stands in for how
/// substantive an article is. The sort is stable, so equal lengths
/// keep the aggregator's ordering.
pub fn select_top(mut articles: Vec<EnrichedArticle>, n: i64) -> Vec<EnrichedArticle> {
    articles.retain(|a| !a.article.text.is_empty());
    articles.sort_by(|a, b| b.article.text.len().cmp(&a.article.text.len()));
    articles.truncate(clamp_count(n));
    articles
}
