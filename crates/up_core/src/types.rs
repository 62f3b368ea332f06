use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable input to one pipeline run. Owned by the upstream store; the
/// pipeline only reads it. `original_url` is the dedup key across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceArticle {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub featured_image: Option<String>,
    pub original_url: Option<String>,
}

/// Raw hit returned by a search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// A competing article surfaced by discovery. Transient, produced per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorCandidate {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A candidate whose readable content was successfully extracted. Strictly
/// richer than the candidate; never outlives the run that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorDocument {
    pub candidate: CompetitorCandidate,
    pub text: String,
    pub html: String,
    pub excerpt: String,
    pub lead_image: Option<String>,
}

impl CompetitorDocument {
    pub fn url(&self) -> &str {
        &self.candidate.url
    }

    pub fn title(&self) -> &str {
        &self.candidate.title
    }
}

/// Structured comparison between the source and its competitors. Always fully
/// populated: empty lists and score 0 on failure, never absent fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub missing_topics: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub strengths: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub overall_score: u8,
    pub recommendations: Vec<String>,
    pub error: Option<String>,
}

impl GapAnalysis {
    /// All-empty result with score 0 and the failure reason attached.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Default::default()
        }
    }
}

/// One entry in the references block appended to an enhanced article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub url: String,
    pub title: String,
    pub summary: String,
}

/// The publishable unit handed to the article store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedArticlePayload {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub featured_image: Option<String>,
    pub original_url: Option<String>,
    pub competitor_references: Vec<CitationRecord>,
    pub gap_analysis: GapAnalysis,
    pub status: String,
}

/// Acknowledgement returned by the store on publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedArticle {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_gap_analysis_is_fully_populated() {
        let gap = GapAnalysis::failed("upstream timed out");
        assert_eq!(gap.overall_score, 0);
        assert!(gap.missing_topics.is_empty());
        assert!(gap.improvement_areas.is_empty());
        assert!(gap.strengths.is_empty());
        assert!(gap.missing_keywords.is_empty());
        assert!(gap.recommendations.is_empty());
        assert_eq!(gap.error.as_deref(), Some("upstream timed out"));
    }

    #[test]
    fn test_gap_analysis_round_trips_through_json() {
        let gap = GapAnalysis {
            missing_topics: vec!["pricing".to_string()],
            overall_score: 7,
            ..Default::default()
        };
        let json = serde_json::to_string(&gap).unwrap();
        let back: GapAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back.overall_score, 7);
        assert_eq!(back.missing_topics, vec!["pricing"]);
    }
}
