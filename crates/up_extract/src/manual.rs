use scraper::{Html, Selector};

use crate::readability::{byline, page_title, ReadableDocument};
use crate::text::visible_text;

/// Probed in priority order when readability scoring finds nothing usable.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".article-body",
    ".post-body",
    ".story-body",
    "#content",
    ".content",
];

/// Minimum visible text for a probed container to qualify.
const MIN_FALLBACK_CHARS: usize = 500;

/// Manual extraction fallback: probe known content containers, then fall back
/// to concatenating every paragraph on the page.
pub fn extract(doc: &Html) -> Option<ReadableDocument> {
    for selector in CONTENT_SELECTORS {
        let sel = Selector::parse(selector).unwrap();
        if let Some(el) = doc.select(&sel).next() {
            let mut text = String::new();
            visible_text(el, &mut text);
            if text.trim().len() >= MIN_FALLBACK_CHARS {
                return Some(build(doc, el.inner_html(), text));
            }
        }
    }

    let p_sel = Selector::parse("p").unwrap();
    let paragraphs: Vec<String> = doc
        .select(&p_sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if paragraphs.is_empty() {
        return None;
    }

    let text = paragraphs.join("\n\n");
    let html = paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", p))
        .collect::<Vec<_>>()
        .join("\n");
    Some(build(doc, html, text))
}

fn build(doc: &Html, html: String, text: String) -> ReadableDocument {
    let excerpt = crate::text::truncate_chars(text.trim(), 200);
    ReadableDocument {
        title: page_title(doc).unwrap_or_default(),
        byline: byline(doc),
        length: text.trim().len(),
        html,
        text,
        excerpt,
    }
}

/// Prefer the social-preview image, then the first image inside a content
/// container.
pub fn lead_image(doc: &Html) -> Option<String> {
    let og_image = Selector::parse("meta[property='og:image']").unwrap();
    if let Some(content) = doc
        .select(&og_image)
        .next()
        .and_then(|el| el.value().attr("content"))
    {
        let trimmed = content.trim();
        if trimmed.starts_with("http") {
            return Some(trimmed.to_string());
        }
    }

    for selector in CONTENT_SELECTORS {
        let sel = Selector::parse(&format!("{} img", selector)).unwrap();
        if let Some(src) = doc
            .select(&sel)
            .filter_map(|img| img.value().attr("src"))
            .find(|src| src.starts_with("http"))
        {
            return Some(src.to_string());
        }
    }
    None
}
