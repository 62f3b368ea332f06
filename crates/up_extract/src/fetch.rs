use std::time::Duration;

use tracing::warn;
use up_core::Result;

/// Some publishers serve bot-looking clients an empty shell, so fetches go
/// out with a realistic desktop browser identity.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Fetch a page body. Any failure (network, timeout, non-2xx) is logged and
/// yields `None`; callers drop the candidate instead of retrying.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("🕸️ Fetch failed for {}: {}", url, e);
            return None;
        }
    };

    if !response.status().is_success() {
        warn!("🕸️ Fetch of {} returned {}", url, response.status());
        return None;
    }

    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!("🕸️ Reading body of {} failed: {}", url, e);
            None
        }
    }
}
