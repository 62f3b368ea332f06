use scraper::{ElementRef, Html, Node};

/// Elements whose subtree never contributes readable text.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "svg", "form", "nav", "footer", "aside",
    "button",
];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "li", "br", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
    "tr",
];

/// Collect the visible text under `el`, skipping chrome and boilerplate
/// subtrees and inserting line breaks at block boundaries.
pub(crate) fn visible_text(el: ElementRef<'_>, out: &mut String) {
    if SKIP_TAGS.contains(&el.value().name()) {
        return;
    }
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            _ => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    visible_text(child_el, out);
                    if BLOCK_TAGS.contains(&child_el.value().name()) {
                        out.push('\n');
                    }
                }
            }
        }
    }
}

/// Strip all markup from an HTML fragment, keeping visible text only.
pub fn strip_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    visible_text(fragment.root_element(), &mut out);
    out
}

/// Collapse runs of whitespace within paragraphs and normalize paragraph
/// breaks to exactly one blank line.
pub fn normalize_text(raw: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(collapsed);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}

/// Truncate to at most `max` characters, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_drops_markup_and_scripts() {
        let html = "<p>Hello <b>world</b></p><script>var x = 1;</script><p>Again</p>";
        let text = strip_tags(html);
        assert!(text.contains("Hello world"));
        assert!(text.contains("Again"));
        assert!(!text.contains("var x"));
    }

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        let raw = "First   line\nstill  first\n\n\n\nSecond   paragraph\n";
        let normalized = normalize_text(raw);
        assert_eq!(normalized, "First line still first\n\nSecond paragraph");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte characters must not be split.
        assert_eq!(truncate_chars("añejo", 2), "añ");
    }
}
