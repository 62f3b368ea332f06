use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;
use up_core::{Result, SearchHit, SearchProvider};

const ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Keyless fallback provider scraping the DuckDuckGo HTML endpoint.
#[derive(Debug)]
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
}

impl DuckDuckGoProvider {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, num: usize) -> Result<Vec<SearchHit>> {
        let body = self
            .client
            .get(ENDPOINT)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_results(&body, num))
    }
}

/// Parse the result list out of a DuckDuckGo HTML page.
fn parse_results(body: &str, num: usize) -> Vec<SearchHit> {
    let doc = Html::parse_document(body);
    let result_sel = Selector::parse(".result").unwrap();
    let link_sel = Selector::parse("a.result__a").unwrap();
    let snippet_sel = Selector::parse(".result__snippet").unwrap();

    let mut hits = Vec::new();
    for result in doc.select(&result_sel) {
        let Some(link) = result.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_href(href) else {
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(SearchHit {
            title,
            link: url,
            snippet,
        });
        if hits.len() >= num {
            break;
        }
    }
    hits
}

/// DuckDuckGo wraps destinations in a redirect carrying the real URL in the
/// `uddg` query parameter.
fn resolve_href(href: &str) -> Option<String> {
    if href.contains("duckduckgo.com/l/") {
        let absolute = if let Some(rest) = href.strip_prefix("//") {
            format!("https://{}", rest)
        } else {
            href.to_string()
        };
        let parsed = Url::parse(&absolute).ok()?;
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned());
    }
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_href_unwraps_redirects() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fblog%2Fchatbots&rut=abc";
        assert_eq!(
            resolve_href(href).as_deref(),
            Some("https://example.com/blog/chatbots")
        );
    }

    #[test]
    fn test_resolve_href_passes_plain_urls() {
        assert_eq!(
            resolve_href("https://example.com/a").as_deref(),
            Some("https://example.com/a")
        );
        assert!(resolve_href("/relative/path").is_none());
    }

    #[test]
    fn test_parse_results_extracts_hits() {
        let body = r#"<html><body>
            <div class="result">
              <a class="result__a" href="https://example.com/blog/one">First Result</a>
              <div class="result__snippet">Snippet one</div>
            </div>
            <div class="result">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.org%2Fguide">Second</a>
            </div>
            <div class="result"><span>no link</span></div>
        </body></html>"#;

        let hits = parse_results(body, 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "First Result");
        assert_eq!(hits[0].link, "https://example.com/blog/one");
        assert_eq!(hits[0].snippet, "Snippet one");
        assert_eq!(hits[1].link, "https://example.org/guide");
        assert_eq!(hits[1].snippet, "");
    }

    #[test]
    fn test_parse_results_honors_limit() {
        let body = r#"<html><body>
            <div class="result"><a class="result__a" href="https://a.com/x">A</a></div>
            <div class="result"><a class="result__a" href="https://b.com/x">B</a></div>
        </body></html>"#;
        assert_eq!(parse_results(body, 1).len(), 1);
    }
}
