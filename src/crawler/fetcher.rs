use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::{CacheKind, CrawlCache};
use crate::models::PageContent;

const FETCH_TIMEOUT: Duration = Duration::from_secs(12);

/// Single-page GET with a fixed browser identity, consulting the page cache
/// before any network access. Every failure collapses to `None`.
pub struct PageFetcher {
    client: Client,
    cache: CrawlCache,
}

impl PageFetcher {
    pub fn new(cache: CrawlCache) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(crate::ACCEPT_LANGUAGE),
        );

        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, cache }
    }

    pub async fn get(&self, url: &str) -> Option<PageContent> {
        if let Some(body) = self.cache.get_fresh(CacheKind::Pages, url).await {
            return Some(PageContent { body });
        }

        debug!("🌐 Fetching: {}", url);
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("Fetch returned {} for {}", response.status(), url);
            return None;
        }

        let body = response.text().await.ok()?;
        self.cache.put(CacheKind::Pages, url, &body).await;
        Some(PageContent { body })
    }
}
