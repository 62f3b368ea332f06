use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use up_core::{
    ArticleStore, CreatedArticle, EnhancedArticlePayload, Error, Result, SourceArticle,
};

/// The article service over its REST boundary. Listing and publishing both go
/// through `/articles`; derived-article lookups ask only for the dedup field.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct DerivedRef {
    original_url: Option<String>,
}

impl HttpStore {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ArticleStore for HttpStore {
    async fn list_source_articles(&self, status: &str) -> Result<Vec<SourceArticle>> {
        let url = format!("{}/articles", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("status", status)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "listing articles failed with {}",
                response.status()
            )));
        }

        let articles = response.json::<Vec<SourceArticle>>().await?;
        debug!("📚 Store returned {} '{}' articles", articles.len(), status);
        Ok(articles)
    }

    async fn list_derived_urls(&self, status: &str) -> Result<Vec<String>> {
        let url = format!("{}/articles", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("status", status), ("fields", "original_url")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "listing derived articles failed with {}",
                response.status()
            )));
        }

        let refs = response.json::<Vec<DerivedRef>>().await?;
        Ok(refs.into_iter().filter_map(|r| r.original_url).collect())
    }

    async fn create_article(&self, payload: &EnhancedArticlePayload) -> Result<CreatedArticle> {
        let url = format!("{}/articles", self.base_url);
        let response = self.client.post(&url).json(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "publish rejected with {}: {}",
                status, body
            )));
        }

        Ok(response.json::<CreatedArticle>().await?)
    }
}
