use ca_core::EnrichedArticle;

/// The instructional template every note must follow. The generation
/// service is told to fill these fields verbatim.
pub const NOTE_TEMPLATE: &str = "You are an assistant generating UPSC Current Affairs notes.
Output strictly in this template:

Title:
Source/Date:
Why in News:
Key Facts (3-6 bullet points):
GS Paper Mapping: (GS I/II/III/IV + brief rationale)
Relevance/Implications (2-4 bullets):
Schemes/Acts/International (if applicable):
Prelims Pointers (2-4 bullets):
Mains Practice Question:

Keep it concise and exam-oriented. Do not include unrelated content.
";

/// `<url> | <publish_date-or-feed_published>` — the line the note's
/// Source/Date field is derived from.
pub fn source_line(article: &EnrichedArticle) -> String {
    format!("{} | {}", article.article.url, article.source_date())
}

/// Assemble the full prompt: template, article title, source line,
/// and the complete article text.
pub fn build_prompt(article: &EnrichedArticle) -> String {
    format!(
        "{}\n\nArticle Title: {}\nSource & Date: {}\n\nArticle Content:\n{}\n",
        NOTE_TEMPLATE,
        article.article.title,
        source_line(article),
        article.article.text,
    )
}
