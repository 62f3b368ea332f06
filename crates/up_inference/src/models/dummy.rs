use async_trait::async_trait;
use up_core::{Error, GenerationOptions, Result, TextGenerator};

use crate::enhance::{ADDITION_CLASS, SOURCE_DELIM_CLOSE, SOURCE_DELIM_OPEN};

/// Offline generator for tests and dry runs. It recognizes the two prompt
/// shapes the pipeline produces and answers each with a minimal, contract-
/// compliant response: canned gap JSON, or the original HTML echoed back
/// with one marked addition appended.
#[derive(Debug, Default)]
pub struct DummyGenerator;

#[async_trait]
impl TextGenerator for DummyGenerator {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String> {
        if prompt.contains("missing_topics") {
            return Ok(canned_gap_json().to_string());
        }

        let source = source_html(prompt).ok_or_else(|| {
            Error::Generation("prompt carries no delimited source document".to_string())
        })?;
        Ok(format!(
            "<h1>Enhanced Draft</h1>{}<div class=\"{}\"><p>Additional context drawn from \
             comparable coverage of this topic.</p></div>",
            source, ADDITION_CLASS
        ))
    }
}

fn canned_gap_json() -> &'static str {
    r#"{
  "missing_topics": ["pricing comparison"],
  "improvement_areas": ["add concrete examples"],
  "strengths": ["clear structure"],
  "missing_keywords": ["cost"],
  "overall_score": 6,
  "recommendations": ["Cover pricing", "Add examples"]
}"#
}

fn source_html(prompt: &str) -> Option<&str> {
    let start = prompt.find(SOURCE_DELIM_OPEN)? + SOURCE_DELIM_OPEN.len();
    let end = prompt[start..].find(SOURCE_DELIM_CLOSE)? + start;
    Some(prompt[start..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gap_prompt_gets_parseable_json() {
        let generator = DummyGenerator;
        let out = generator
            .generate(
                "Respond with JSON fields missing_topics, ...",
                &GenerationOptions::default(),
            )
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["overall_score"], 6);
    }

    #[tokio::test]
    async fn test_enhancement_prompt_echoes_source_with_marked_addition() {
        let generator = DummyGenerator;
        let prompt = format!(
            "Improve this.\n{}\n<p>Original body.</p>\n{}\n",
            SOURCE_DELIM_OPEN, SOURCE_DELIM_CLOSE
        );
        let out = generator
            .generate(&prompt, &GenerationOptions::default())
            .await
            .unwrap();
        assert!(out.contains("<p>Original body.</p>"));
        assert!(out.contains(ADDITION_CLASS));
    }

    #[tokio::test]
    async fn test_prompt_without_delimiters_is_an_error() {
        let generator = DummyGenerator;
        let result = generator
            .generate("no document here", &GenerationOptions::default())
            .await;
        assert!(matches!(result, Err(Error::Generation(_))));
    }
}
