use std::sync::Arc;

use scraper::{Html, Selector};
use tracing::debug;
use up_core::{
    CompetitorDocument, Error, GenerationOptions, Result, SourceArticle, TextGenerator,
};

use crate::util::strip_code_fences;

/// Class wrapping every generator-inserted paragraph. This is the only thing
/// distinguishing new text from the original article in the serialized body.
pub const ADDITION_CLASS: &str = "uplift-addition";

/// Delimiters around the source HTML inside the enhancement prompt.
pub const SOURCE_DELIM_OPEN: &str = "<<<HTML";
pub const SOURCE_DELIM_CLOSE: &str = "HTML>>>";

/// Upper bound on the source body submitted for enhancement. Preservation is
/// verified against the full body, so a source that does not fit the prompt
/// whole can never verify; such sources are rejected before any generation
/// call instead of being truncated.
pub const MAX_SOURCE_CHARS: usize = 12000;

const COMPETITOR_BUDGET: usize = 1200;

/// One inserted paragraph, anchored at a byte offset into the original body.
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion {
    pub offset: usize,
    pub html: String,
}

/// The original body plus an ordered list of insertions. Markers exist only
/// at the parse/render boundary; internally the original text is held
/// verbatim, which makes the preservation invariant checkable instead of
/// trust-based.
#[derive(Debug, Clone)]
pub struct EnhancedBody {
    original: String,
    insertions: Vec<Insertion>,
}

impl EnhancedBody {
    /// Parse a generated document against the original body. Fails with
    /// `ContentPreservation` when the original does not survive verbatim
    /// once addition markers are stripped.
    pub fn parse(original: &str, generated: &str) -> Result<Self> {
        let (stripped, marked) = strip_and_collect(generated)?;

        let base = stripped.find(original).ok_or_else(|| {
            Error::ContentPreservation(
                "original content does not survive verbatim in the generated document".to_string(),
            )
        })?;
        let end = base + original.len();

        let mut insertions = Vec::new();
        for (absolute, html) in marked {
            if html.is_empty() {
                continue;
            }
            let mut offset = absolute.clamp(base, end) - base;
            while !original.is_char_boundary(offset) {
                offset -= 1;
            }
            insertions.push(Insertion { offset, html });
        }

        Ok(Self {
            original: original.to_string(),
            insertions,
        })
    }

    /// A body with no additions at all; used when a generator produces a
    /// document that is exactly the original.
    pub fn unchanged(original: &str) -> Self {
        Self {
            original: original.to_string(),
            insertions: Vec::new(),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn insertions(&self) -> &[Insertion] {
        &self.insertions
    }

    /// Serialize back to marker syntax: the original body with each insertion
    /// wrapped in the addition div at its anchor. No other bytes are added,
    /// so stripping the markers reproduces the original exactly.
    pub fn render(&self) -> String {
        let mut ordered = self.insertions.clone();
        ordered.sort_by_key(|insertion| insertion.offset);

        let mut out = String::with_capacity(self.original.len() + 256 * ordered.len());
        let mut cursor = 0;
        for insertion in &ordered {
            out.push_str(&self.original[cursor..insertion.offset]);
            out.push_str(&format!(
                "<div class=\"{}\">{}</div>",
                ADDITION_CLASS, insertion.html
            ));
            cursor = insertion.offset;
        }
        out.push_str(&self.original[cursor..]);
        out
    }
}

/// Remove every addition block from a generated document, returning the
/// remaining text. Public so callers can check preservation directly.
pub fn strip_markers(generated: &str) -> Result<String> {
    strip_and_collect(generated).map(|(stripped, _)| stripped)
}

fn strip_and_collect(generated: &str) -> Result<(String, Vec<(usize, String)>)> {
    let marker = format!("<div class=\"{}\">", ADDITION_CLASS);
    let mut stripped = String::with_capacity(generated.len());
    let mut marked = Vec::new();

    let mut rest = generated;
    loop {
        match rest.find(&marker) {
            None => {
                stripped.push_str(rest);
                break;
            }
            Some(start) => {
                stripped.push_str(&rest[..start]);
                let after_open = &rest[start + marker.len()..];
                let (inner, consumed) = find_matching_close(after_open).ok_or_else(|| {
                    Error::MalformedOutput("unterminated addition marker".to_string())
                })?;
                marked.push((stripped.len(), inner.trim().to_string()));
                rest = &after_open[consumed..];
            }
        }
    }

    Ok((stripped, marked))
}

/// Find the `</div>` matching an already-consumed opening div, tolerating
/// nested divs inside the addition. Returns the inner HTML and the length
/// consumed including the closing tag.
fn find_matching_close(s: &str) -> Option<(&str, usize)> {
    const OPEN: &str = "<div";
    const CLOSE: &str = "</div>";

    let mut depth = 1usize;
    let mut pos = 0usize;
    loop {
        let open = s[pos..].find(OPEN);
        let close = s[pos..].find(CLOSE)?;
        match open {
            Some(o) if o < close => {
                depth += 1;
                pos += o + OPEN.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[..pos + close], pos + close + CLOSE.len()));
                }
                pos += close + CLOSE.len();
            }
        }
    }
}

/// A parsed, verified enhancement ready for assembly.
#[derive(Debug, Clone)]
pub struct Enhancement {
    pub title: String,
    pub body: EnhancedBody,
}

/// Asks the generator for an augmented version of the source and verifies
/// the content-preservation contract on the way back.
pub struct ContentEnhancer {
    generator: Arc<dyn TextGenerator>,
}

impl ContentEnhancer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn enhance(
        &self,
        source: &SourceArticle,
        competitors: &[CompetitorDocument],
    ) -> Result<Enhancement> {
        if source.content.chars().count() > MAX_SOURCE_CHARS {
            return Err(Error::ContentPreservation(format!(
                "source body exceeds the {} char enhancement budget",
                MAX_SOURCE_CHARS
            )));
        }

        let prompt = build_prompt(source, competitors);
        let raw = self
            .generator
            .generate(
                &prompt,
                &GenerationOptions {
                    temperature: 0.7,
                    max_tokens: 4096,
                },
            )
            .await?;

        let cleaned = strip_code_fences(&raw);
        let title =
            extract_title(cleaned).unwrap_or_else(|| format!("Enhanced: {}", source.title));
        let body = EnhancedBody::parse(&source.content, cleaned)?;
        debug!(
            "✍️ Enhancement for '{}' carries {} insertions",
            source.title,
            body.insertions().len()
        );

        Ok(Enhancement { title, body })
    }
}

fn build_prompt(source: &SourceArticle, competitors: &[CompetitorDocument]) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are an editor improving a published article by adding to it. Rewrite nothing.\n\n\
         Rules:\n\
         1. Never delete, shorten or reorder any existing sentence of the original.\n\
         2. Only insert new paragraphs between existing ones, synthesizing the competitor \
         insights below in your own words. Do not copy competitor text.\n",
    );
    prompt.push_str(&format!(
        "3. Wrap every inserted paragraph, and only inserted paragraphs, in \
         <div class=\"{}\">...</div>.\n",
        ADDITION_CLASS
    ));
    prompt.push_str(
        "4. Keep every image and embedded media element exactly where it is in the original.\n\
         5. Reply with a single HTML document and nothing else, starting with an <h1> title.\n\n",
    );

    // The caller has already bounded the source, so it goes in whole; a
    // truncated source could never pass the preservation check.
    prompt.push_str("ORIGINAL ARTICLE HTML:\n");
    prompt.push_str(SOURCE_DELIM_OPEN);
    prompt.push('\n');
    prompt.push_str(&source.content);
    prompt.push('\n');
    prompt.push_str(SOURCE_DELIM_CLOSE);
    prompt.push_str("\n\nCOMPETITOR INSIGHTS:\n");

    for (index, competitor) in competitors.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} ({}): {}\n",
            index + 1,
            competitor.title(),
            competitor.url(),
            up_extract::text::truncate_chars(&competitor.text, COMPETITOR_BUDGET)
        ));
    }
    prompt
}

fn extract_title(generated: &str) -> Option<String> {
    let doc = Html::parse_document(generated);
    let h1 = Selector::parse("h1").unwrap();
    doc.select(&h1)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
}
