use up_core::{CitationRecord, CompetitorDocument};

const SUMMARY_CHARS: usize = 200;

/// The references section appended to an enhanced article, plus the
/// structured records stored alongside it.
#[derive(Debug, Clone, Default)]
pub struct CitationBlock {
    pub html: String,
    pub records: Vec<CitationRecord>,
}

impl CitationBlock {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build citations for the competitor documents that informed an enhancement.
/// Pure over its inputs; an empty document list yields an empty block.
pub fn assemble(documents: &[CompetitorDocument]) -> CitationBlock {
    let records: Vec<CitationRecord> = documents
        .iter()
        .map(|doc| CitationRecord {
            url: doc.url().to_string(),
            title: doc.title().to_string(),
            summary: up_extract::text::truncate_chars(summary_source(doc), SUMMARY_CHARS),
        })
        .collect();

    if records.is_empty() {
        return CitationBlock::default();
    }

    let mut html = String::from("<div class=\"references\"><h3>Sources</h3><ul>");
    for record in &records {
        let label = hostname(&record.url).unwrap_or_else(|| record.url.clone());
        html.push_str(&format!(
            "<li><a href=\"{}\" rel=\"nofollow\">{}</a> ({})</li>",
            escape(&record.url),
            escape(&record.title),
            escape(&label)
        ));
    }
    html.push_str("</ul></div>");

    CitationBlock { html, records }
}

fn summary_source(doc: &CompetitorDocument) -> &str {
    if doc.excerpt.trim().is_empty() {
        &doc.text
    } else {
        &doc.excerpt
    }
}

fn hostname(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()?
        .host_str()
        .map(|h| h.to_string())
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use up_core::CompetitorCandidate;

    fn document(url: &str, title: &str, excerpt: &str) -> CompetitorDocument {
        CompetitorDocument {
            candidate: CompetitorCandidate {
                title: title.to_string(),
                url: url.to_string(),
                snippet: String::new(),
            },
            text: "Full body text.".to_string(),
            html: "<p>Full body text.</p>".to_string(),
            excerpt: excerpt.to_string(),
            lead_image: None,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_block() {
        let block = assemble(&[]);
        assert!(block.is_empty());
        assert!(block.html.is_empty());
    }

    #[test]
    fn test_block_carries_host_labels_and_records() {
        let block = assemble(&[
            document("https://rival.com/blog/x", "Rival piece", "An excerpt."),
            document("https://other.org/guide/y", "Other guide", ""),
        ]);
        assert_eq!(block.records.len(), 2);
        assert!(block.html.contains("(rival.com)"));
        assert!(block.html.contains("(other.org)"));
        assert_eq!(block.records[0].summary, "An excerpt.");
        // Empty excerpt falls back to body text.
        assert_eq!(block.records[1].summary, "Full body text.");
    }

    #[test]
    fn test_titles_are_escaped() {
        let block = assemble(&[document(
            "https://rival.com/blog/x",
            "Ben & Jerry's <guide>",
            "e",
        )]);
        assert!(block.html.contains("Ben &amp; Jerry's &lt;guide&gt;"));
    }

    #[test]
    fn test_summaries_are_truncated() {
        let long = "x".repeat(500);
        let block = assemble(&[document("https://rival.com/blog/x", "T", &long)]);
        assert!(block.records[0].summary.chars().count() <= 200);
    }
}
