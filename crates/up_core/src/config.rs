use std::env;
use std::time::Duration;

use crate::{Error, Result};

/// Runtime configuration, read from the environment once at process start.
/// CLI flags may override individual fields afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the article storage service.
    pub store_url: String,
    /// Key for the primary search provider. Absent means fallback-only.
    pub search_api_key: Option<String>,
    /// Key for the generative text service. Validated at generator
    /// construction, not here: a missing key is only fatal when a real
    /// backend is selected.
    pub generator_api_key: Option<String>,
    pub model_name: String,
    /// Our own domain, excluded from discovery so competitors are external.
    pub own_domain: Option<String>,
    pub competitors_per_item: usize,
    pub pacing_delay: Duration,
    pub success_cap: usize,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:3000".to_string(),
            search_api_key: None,
            generator_api_key: None,
            model_name: "gpt-4o-mini".to_string(),
            own_domain: None,
            competitors_per_item: 2,
            pacing_delay: Duration::from_secs(20),
            success_cap: 10,
            fetch_timeout: Duration::from_secs(15),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("UPLIFT_STORE_URL") {
            config.store_url = url;
        }
        config.search_api_key = env::var("SERPER_API_KEY").ok().filter(|k| !k.is_empty());
        config.generator_api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        if let Ok(model) = env::var("UPLIFT_MODEL") {
            config.model_name = model;
        }
        config.own_domain = env::var("UPLIFT_OWN_DOMAIN").ok().filter(|d| !d.is_empty());

        if let Some(n) = parse_env("UPLIFT_COMPETITORS")? {
            config.competitors_per_item = n;
        }
        if let Some(secs) = parse_env("UPLIFT_DELAY_SECS")? {
            config.pacing_delay = Duration::from_secs(secs);
        }
        if let Some(n) = parse_env("UPLIFT_SUCCESS_CAP")? {
            config.success_cap = n;
        }
        if let Some(secs) = parse_env("UPLIFT_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} is not a valid number: {}", name, raw))),
        Err(_) => Ok(None),
    }
}
