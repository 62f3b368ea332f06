use std::sync::Arc;

use up_core::{ArticleStore, Config, Error, Result};

pub mod backends;

pub use backends::http::HttpStore;
pub use backends::memory::MemoryStore;

pub fn create_store(kind: &str, config: &Config) -> Result<Arc<dyn ArticleStore>> {
    match kind {
        "http" => Ok(Arc::new(HttpStore::new(
            config.store_url.clone(),
            config.fetch_timeout,
        )?)),
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(Error::Config(format!("Unknown store backend: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_store_rejects_unknown_backend() {
        let config = Config::default();
        assert!(matches!(
            create_store("redis", &config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_create_store_builds_known_backends() {
        let config = Config::default();
        assert!(create_store("memory", &config).is_ok());
        assert!(create_store("http", &config).is_ok());
    }
}
