use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use up_core::{CompetitorCandidate, Config, Result, SearchHit, SearchProvider};

pub mod filter;
pub mod providers;

pub use providers::{DuckDuckGoProvider, SerperProvider};

/// Extra hits requested beyond the target count, since filtering prunes.
const FILTER_MARGIN: usize = 6;

/// Finds competitor articles for a topic through a primary search provider
/// with a keyless fallback. Never errors: a run out of providers simply means
/// no competitors this time.
pub struct Discovery {
    primary: Option<Arc<dyn SearchProvider>>,
    fallback: Arc<dyn SearchProvider>,
    own_domain: Option<String>,
}

impl Discovery {
    pub fn new(
        primary: Option<Arc<dyn SearchProvider>>,
        fallback: Arc<dyn SearchProvider>,
        own_domain: Option<String>,
    ) -> Self {
        Self {
            primary,
            fallback,
            own_domain,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let primary = match &config.search_api_key {
            Some(key) => Some(Arc::new(SerperProvider::new(key.clone(), config.fetch_timeout)?)
                as Arc<dyn SearchProvider>),
            None => None,
        };
        let fallback = Arc::new(DuckDuckGoProvider::new(config.fetch_timeout)?);
        Ok(Self::new(primary, fallback, config.own_domain.clone()))
    }

    /// Discover up to `count` competitor candidates for `topic`. An empty
    /// result means "no competitors available", not an error.
    pub async fn discover(&self, topic: &str, count: usize) -> Vec<CompetitorCandidate> {
        let query = self.build_query(topic);
        let wanted = count + FILTER_MARGIN;

        let hits = match &self.primary {
            Some(primary) => match primary.search(&query, wanted).await {
                Ok(hits) if !hits.is_empty() => hits,
                Ok(_) => {
                    info!("🔍 {} returned nothing, trying fallback", primary.name());
                    self.fallback_search(&query, wanted).await
                }
                Err(e) => {
                    warn!("🔍 {} failed ({}), trying fallback", primary.name(), e);
                    self.fallback_search(&query, wanted).await
                }
            },
            None => self.fallback_search(&query, wanted).await,
        };

        self.select_candidates(hits, count)
    }

    async fn fallback_search(&self, query: &str, wanted: usize) -> Vec<SearchHit> {
        match self.fallback.search(query, wanted).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("🔍 {} failed too: {}", self.fallback.name(), e);
                Vec::new()
            }
        }
    }

    /// Disambiguate towards editorial content and keep our own pages out of
    /// the competitor set.
    fn build_query(&self, topic: &str) -> String {
        match &self.own_domain {
            Some(domain) => format!("{} blog article guide -site:{}", topic, domain),
            None => format!("{} blog article guide", topic),
        }
    }

    fn select_candidates(&self, hits: Vec<SearchHit>, count: usize) -> Vec<CompetitorCandidate> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for hit in hits {
            if candidates.len() >= count {
                break;
            }
            if let Some(domain) = &self.own_domain {
                if hit.link.contains(domain.as_str()) {
                    continue;
                }
            }
            if !filter::is_article_like(&hit.link, &hit.title) {
                continue;
            }
            if !seen.insert(hit.link.clone()) {
                continue;
            }
            candidates.push(CompetitorCandidate {
                title: hit.title,
                url: hit.link,
                snippet: hit.snippet,
            });
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use up_core::Error;

    struct StaticProvider {
        hits: Vec<SearchHit>,
    }

    #[async_trait]
    impl SearchProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }

        async fn search(&self, _query: &str, _num: usize) -> up_core::Result<Vec<SearchHit>> {
            Ok(self.hits.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl SearchProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn search(&self, _query: &str, _num: usize) -> up_core::Result<Vec<SearchHit>> {
            Err(Error::Search("quota exhausted".to_string()))
        }
    }

    fn hit(link: &str, title: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            link: link.to_string(),
            snippet: format!("snippet for {}", title),
        }
    }

    #[tokio::test]
    async fn test_discover_filters_and_dedups() {
        let provider = Arc::new(StaticProvider {
            hits: vec![
                hit("https://facebook.com/page/posts/1", "Viral post"),
                hit("https://example.com/blog/chatbots", "Chatbots"),
                hit("https://example.com/blog/chatbots", "Chatbots again"),
                hit("https://other.com/guide/support", "Support Guide"),
            ],
        });
        let discovery = Discovery::new(
            Some(provider.clone()),
            Arc::new(StaticProvider { hits: vec![] }),
            None,
        );

        let candidates = discovery.discover("chatbots", 5).await;
        let urls: Vec<&str> = candidates.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/blog/chatbots",
                "https://other.com/guide/support"
            ]
        );
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back() {
        let fallback = Arc::new(StaticProvider {
            hits: vec![hit("https://example.com/blog/a", "A")],
        });
        let discovery = Discovery::new(Some(Arc::new(FailingProvider)), fallback, None);

        let candidates = discovery.discover("topic", 2).await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://example.com/blog/a");
    }

    #[tokio::test]
    async fn test_total_failure_yields_empty_list() {
        let discovery = Discovery::new(
            Some(Arc::new(FailingProvider)),
            Arc::new(FailingProvider),
            None,
        );
        assert!(discovery.discover("topic", 2).await.is_empty());
    }

    #[tokio::test]
    async fn test_own_domain_is_excluded() {
        let provider = Arc::new(StaticProvider {
            hits: vec![
                hit("https://ourblog.com/blog/self-promo", "Our own piece"),
                hit("https://rival.com/blog/better-piece", "Rival piece"),
            ],
        });
        let discovery = Discovery::new(
            Some(provider),
            Arc::new(StaticProvider { hits: vec![] }),
            Some("ourblog.com".to_string()),
        );

        let candidates = discovery.discover("topic", 5).await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://rival.com/blog/better-piece");
    }

    #[tokio::test]
    async fn test_count_is_capped() {
        let provider = Arc::new(StaticProvider {
            hits: (0..10)
                .map(|i| hit(&format!("https://site{i}.com/blog/x"), "Post"))
                .collect(),
        });
        let discovery = Discovery::new(
            Some(provider),
            Arc::new(StaticProvider { hits: vec![] }),
            None,
        );
        assert_eq!(discovery.discover("topic", 3).await.len(), 3);
    }

    #[test]
    fn test_query_decoration() {
        let discovery = Discovery::new(
            None,
            Arc::new(StaticProvider { hits: vec![] }),
            Some("ourblog.com".to_string()),
        );
        assert_eq!(
            discovery.build_query("chatbot benefits"),
            "chatbot benefits blog article guide -site:ourblog.com"
        );
    }
}
