use scraper::{ElementRef, Html, Selector};

use crate::text::visible_text;

/// Best-effort readable view of a fetched page.
#[derive(Debug, Clone)]
pub struct ReadableDocument {
    pub title: String,
    pub byline: Option<String>,
    pub html: String,
    pub text: String,
    pub excerpt: String,
    pub length: usize,
}

/// A container needs at least this much text to be considered the article.
const MIN_CONTENT_CHARS: usize = 250;

const POSITIVE_HINTS: &[&str] = &[
    "article", "content", "post", "entry", "body", "main", "story", "text", "blog",
];
const NEGATIVE_HINTS: &[&str] = &[
    "nav", "sidebar", "side-bar", "footer", "comment", "menu", "share", "social", "related",
    "promo", "banner", "widget", "breadcrumb", "masthead", "subscribe",
];

/// Isolate the main article subtree by scoring candidate containers on text
/// volume, paragraph density, link density and class/id hints.
pub fn extract(doc: &Html) -> Option<ReadableDocument> {
    let candidates = Selector::parse("article, main, section, div").unwrap();

    let mut best: Option<(f32, ElementRef<'_>, String)> = None;
    for el in doc.select(&candidates) {
        let mut text = String::new();
        visible_text(el, &mut text);
        let trimmed_len = text.trim().len();
        if trimmed_len < MIN_CONTENT_CHARS {
            continue;
        }
        let score = score_element(el, &text);
        if best.as_ref().map_or(true, |(s, _, _)| score > *s) {
            best = Some((score, el, text));
        }
    }

    let (score, winner, text) = best?;
    if score <= 0.0 {
        return None;
    }

    let excerpt = first_paragraph(winner).unwrap_or_else(|| {
        crate::text::truncate_chars(text.trim(), 200)
    });

    Some(ReadableDocument {
        title: page_title(doc).unwrap_or_default(),
        byline: byline(doc),
        html: winner.inner_html(),
        length: text.trim().len(),
        excerpt,
        text,
    })
}

fn score_element(el: ElementRef<'_>, text: &str) -> f32 {
    let text_len = text.trim().len();

    let link_sel = Selector::parse("a").unwrap();
    let link_len: usize = el
        .select(&link_sel)
        .map(|a| a.text().collect::<String>().trim().len())
        .sum();
    let link_density = if text_len > 0 {
        link_len as f32 / text_len as f32
    } else {
        1.0
    };

    let p_sel = Selector::parse("p").unwrap();
    let paragraphs = el
        .select(&p_sel)
        .filter(|p| p.text().collect::<String>().trim().len() > 40)
        .count();

    let base = (text_len.min(4000) as f32 / 100.0) * (1.0 - link_density);
    base + paragraphs as f32 * 3.0 + class_id_weight(el)
}

fn class_id_weight(el: ElementRef<'_>) -> f32 {
    let mut hints = String::new();
    if let Some(class) = el.value().attr("class") {
        hints.push_str(&class.to_lowercase());
    }
    hints.push(' ');
    if let Some(id) = el.value().attr("id") {
        hints.push_str(&id.to_lowercase());
    }
    // The tag itself is a hint too: <article> and <main> are self-describing.
    hints.push(' ');
    hints.push_str(el.value().name());

    let mut weight = 0.0;
    for hint in POSITIVE_HINTS {
        if hints.contains(hint) {
            weight += 25.0;
        }
    }
    for hint in NEGATIVE_HINTS {
        if hints.contains(hint) {
            weight -= 25.0;
        }
    }
    weight
}

fn first_paragraph(el: ElementRef<'_>) -> Option<String> {
    let p_sel = Selector::parse("p").unwrap();
    el.select(&p_sel)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
}

pub(crate) fn page_title(doc: &Html) -> Option<String> {
    let og_title = Selector::parse("meta[property='og:title']").unwrap();
    if let Some(content) = doc
        .select(&og_title)
        .next()
        .and_then(|el| el.value().attr("content"))
    {
        let trimmed = content.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    let title = Selector::parse("title").unwrap();
    if let Some(text) = doc.select(&title).next() {
        let text = text.text().collect::<String>().trim().to_string();
        if !text.is_empty() {
            return Some(text);
        }
    }

    let h1 = Selector::parse("h1").unwrap();
    doc.select(&h1)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
}

pub(crate) fn byline(doc: &Html) -> Option<String> {
    let meta_author = Selector::parse("meta[name='author']").unwrap();
    if let Some(content) = doc
        .select(&meta_author)
        .next()
        .and_then(|el| el.value().attr("content"))
    {
        let trimmed = content.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    let byline_sel = Selector::parse(".byline, .author, [rel='author']").unwrap();
    doc.select(&byline_sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
}
