pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use traits::{ArticleStore, CompetitorExtractor, GenerationOptions, SearchProvider, TextGenerator};
pub use types::{
    CitationRecord, CompetitorCandidate, CompetitorDocument, CreatedArticle,
    EnhancedArticlePayload, GapAnalysis, SearchHit, SourceArticle,
};

/// Status value carried by articles the pipeline is allowed to process.
pub const STATUS_ORIGINAL: &str = "original";
/// Status value stamped on every article the pipeline publishes.
pub const STATUS_UPDATED: &str = "updated";
