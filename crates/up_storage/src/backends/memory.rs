use async_trait::async_trait;
use tokio::sync::RwLock;
use up_core::{
    ArticleStore, CreatedArticle, EnhancedArticlePayload, Result, SourceArticle, STATUS_ORIGINAL,
};

struct Inner {
    sources: Vec<SourceArticle>,
    published: Vec<EnhancedArticlePayload>,
    next_id: u64,
}

/// In-process store for tests and dry runs. Published articles are retained
/// so dedup behaves like the real service across consecutive runs.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                sources: Vec::new(),
                published: Vec::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn seed_sources(&self, sources: Vec<SourceArticle>) {
        self.inner.write().await.sources.extend(sources);
    }

    pub async fn published(&self) -> Vec<EnhancedArticlePayload> {
        self.inner.read().await.published.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn list_source_articles(&self, status: &str) -> Result<Vec<SourceArticle>> {
        let inner = self.inner.read().await;
        // Seeded sources carry no status field of their own; they are all
        // originals by construction.
        if status == STATUS_ORIGINAL {
            Ok(inner.sources.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn list_derived_urls(&self, status: &str) -> Result<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .published
            .iter()
            .filter(|payload| payload.status == status)
            .filter_map(|payload| payload.original_url.clone())
            .collect())
    }

    async fn create_article(&self, payload: &EnhancedArticlePayload) -> Result<CreatedArticle> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id.to_string();
        inner.next_id += 1;
        inner.published.push(payload.clone());
        Ok(CreatedArticle { id })
    }
}
