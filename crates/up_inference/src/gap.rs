use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;
use up_core::{
    CompetitorDocument, GapAnalysis, GenerationOptions, Result, SourceArticle, TextGenerator,
};
use up_extract::text::{normalize_text, strip_tags, truncate_chars};

use crate::util::strip_code_fences;

const SOURCE_BUDGET: usize = 4000;
const COMPETITOR_BUDGET: usize = 1500;
const MAX_RECOMMENDATIONS: usize = 3;

/// What the model is asked to return. Every field is defaulted so a partial
/// object still parses; the score arrives as a plain integer and is clamped
/// afterwards.
#[derive(Debug, Deserialize)]
struct RawGapAnalysis {
    #[serde(default)]
    missing_topics: Vec<String>,
    #[serde(default)]
    improvement_areas: Vec<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    missing_keywords: Vec<String>,
    #[serde(default)]
    overall_score: i64,
    #[serde(default)]
    recommendations: Vec<String>,
}

/// Compares a source article against competitor documents through the
/// generator. Analysis failures degrade to a defaulted result instead of
/// failing the item; only fatal configuration errors propagate.
pub struct GapAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl GapAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn analyze(
        &self,
        source: &SourceArticle,
        competitors: &[CompetitorDocument],
    ) -> Result<GapAnalysis> {
        let prompt = build_prompt(source, competitors);
        let options = GenerationOptions {
            temperature: 0.2,
            max_tokens: 1024,
        };

        let raw = match self.generator.generate(&prompt, &options).await {
            Ok(raw) => raw,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!("⚠️ Gap analysis call failed for '{}': {}", source.title, err);
                return Ok(GapAnalysis::failed(err.to_string()));
            }
        };

        Ok(parse_analysis(&raw).unwrap_or_else(|err| {
            warn!(
                "⚠️ Gap analysis output unparseable for '{}': {}",
                source.title, err
            );
            GapAnalysis::failed(format!("unparseable analysis output: {}", err))
        }))
    }
}

fn parse_analysis(raw: &str) -> std::result::Result<GapAnalysis, serde_json::Error> {
    let parsed: RawGapAnalysis = serde_json::from_str(strip_code_fences(raw))?;
    let mut recommendations = parsed.recommendations;
    recommendations.truncate(MAX_RECOMMENDATIONS);
    Ok(GapAnalysis {
        missing_topics: parsed.missing_topics,
        improvement_areas: parsed.improvement_areas,
        strengths: parsed.strengths,
        missing_keywords: parsed.missing_keywords,
        overall_score: parsed.overall_score.clamp(0, 10) as u8,
        recommendations,
        error: None,
    })
}

fn build_prompt(source: &SourceArticle, competitors: &[CompetitorDocument]) -> String {
    let source_text = truncate_chars(
        &normalize_text(&strip_tags(&source.content)),
        SOURCE_BUDGET,
    );

    let mut prompt = String::new();
    prompt.push_str(
        "Compare our article against competing coverage of the same topic and report the gaps.\n\n",
    );
    prompt.push_str(&format!(
        "OUR ARTICLE ({}):\n{}\n\nCOMPETING ARTICLES:\n",
        source.title, source_text
    ));
    for (index, competitor) in competitors.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {}:\n{}\n\n",
            index + 1,
            competitor.title(),
            truncate_chars(&competitor.text, COMPETITOR_BUDGET)
        ));
    }
    prompt.push_str(
        "Respond with a single JSON object and nothing else, using exactly these fields:\n\
         {\n\
           \"missing_topics\": [\"...\"],\n\
           \"improvement_areas\": [\"...\"],\n\
           \"strengths\": [\"...\"],\n\
           \"missing_keywords\": [\"...\"],\n\
           \"overall_score\": 0,\n\
           \"recommendations\": [\"...\"]\n\
         }\n\
         overall_score rates our article against the competition from 0 to 10. \
         Give at most three recommendations.",
    );
    prompt
}
