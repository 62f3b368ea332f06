use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use up_core::{Result, SearchHit, SearchProvider};

const ENDPOINT: &str = "https://google.serper.dev/search";

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicHit>,
}

#[derive(Deserialize)]
struct OrganicHit {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Keyed primary search provider speaking the serper.dev JSON API.
pub struct SerperProvider {
    client: reqwest::Client,
    api_key: String,
}

impl SerperProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key })
    }
}

impl fmt::Debug for SerperProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerperProvider")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl SearchProvider for SerperProvider {
    fn name(&self) -> &str {
        "serper"
    }

    async fn search(&self, query: &str, num: usize) -> Result<Vec<SearchHit>> {
        let request = SearchRequest { q: query, num };
        let response = self
            .client
            .post(ENDPOINT)
            .header("X-API-KEY", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResponse>()
            .await?;

        Ok(response
            .organic
            .into_iter()
            .take(num)
            .map(|hit| SearchHit {
                title: hit.title,
                link: hit.link,
                snippet: hit.snippet,
            })
            .collect())
    }
}
