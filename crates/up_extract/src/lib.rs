use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, warn};
use up_core::{CompetitorCandidate, CompetitorDocument, CompetitorExtractor, Result};

pub mod fetch;
pub mod manual;
pub mod readability;
pub mod text;

pub use fetch::build_client;
pub use readability::ReadableDocument;

/// Upper bound on extracted competitor text; keeps downstream generation
/// prompts inside the model context budget.
pub const MAX_TEXT_CHARS: usize = 8000;

/// Fetches competitor pages and extracts their readable article content.
pub struct Extractor {
    client: reqwest::Client,
}

impl Extractor {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: fetch::build_client(timeout)?,
        })
    }

    /// Extraction on already-fetched HTML; split out so it stays testable
    /// without a network.
    pub fn extract_html(html: &str) -> Option<(ReadableDocument, Option<String>)> {
        let doc = Html::parse_document(html);
        let readable = readability::extract(&doc).or_else(|| manual::extract(&doc))?;
        let lead_image = manual::lead_image(&doc);
        Some((readable, lead_image))
    }
}

#[async_trait]
impl CompetitorExtractor for Extractor {
    async fn extract(&self, candidate: &CompetitorCandidate) -> Option<CompetitorDocument> {
        let body = fetch::fetch_page(&self.client, &candidate.url).await?;

        let (readable, lead_image) = match Self::extract_html(&body) {
            Some(extracted) => extracted,
            None => {
                warn!("📄 No readable content in {}", candidate.url);
                return None;
            }
        };

        let normalized = text::normalize_text(&readable.text);
        let truncated = text::truncate_chars(&normalized, MAX_TEXT_CHARS);
        debug!(
            "📄 Extracted {} chars from {}",
            truncated.len(),
            candidate.url
        );

        Some(CompetitorDocument {
            candidate: candidate.clone(),
            text: truncated,
            html: readable.html,
            excerpt: readable.excerpt,
            lead_image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_html_prefers_readability_result() {
        let body = "Readable article prose for the scoring pass to latch onto. ".repeat(10);
        let html = format!(
            "<html><head><meta property=\"og:image\" content=\"https://example.com/x.png\"></head>\
             <body><article><p>{body}</p><p>{body}</p></article></body></html>"
        );
        let (readable, lead_image) = Extractor::extract_html(&html).unwrap();
        assert!(readable.text.contains("scoring pass"));
        assert_eq!(lead_image.as_deref(), Some("https://example.com/x.png"));
    }

    #[test]
    fn test_extract_html_rejects_empty_pages() {
        assert!(Extractor::extract_html("<html><body></body></html>").is_none());
    }
}
