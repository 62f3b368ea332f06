use async_trait::async_trait;

use crate::types::{
    CompetitorCandidate, CompetitorDocument, CreatedArticle, EnhancedArticlePayload, SearchHit,
    SourceArticle,
};
use crate::Result;

/// A web search backend. Two interchangeable implementations exist: a keyed
/// primary and a keyless fallback.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Run a query and return up to `num` raw hits.
    async fn search(&self, query: &str, num: usize) -> Result<Vec<SearchHit>>;
}

/// Sampling knobs for one generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

/// A generative text completion backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Submit a prompt and return the raw completion text.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}

/// Turns a discovered candidate into its extracted readable content.
/// Extraction failures are dropped, not retried, so the output is optional.
#[async_trait]
pub trait CompetitorExtractor: Send + Sync {
    async fn extract(&self, candidate: &CompetitorCandidate) -> Option<CompetitorDocument>;
}

/// The external article storage service, seen through its request/response
/// boundary only.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// List source articles carrying the given status.
    async fn list_source_articles(&self, status: &str) -> Result<Vec<SourceArticle>>;

    /// List the original URLs of already-published derived articles.
    async fn list_derived_urls(&self, status: &str) -> Result<Vec<String>>;

    /// Publish one enhanced article.
    async fn create_article(&self, payload: &EnhancedArticlePayload) -> Result<CreatedArticle>;
}
