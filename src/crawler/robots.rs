use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{CacheKind, CrawlCache};

/// Token matched against robots.txt user-agent groups.
pub const ROBOTS_USER_AGENT: &str = "lead-finder-bot";

const ROBOTS_TIMEOUT: Duration = Duration::from_secs(12);

/// Cache-first robots.txt lookups. Fail-open throughout: an unreachable or
/// empty robots.txt, or a URL the checker cannot make sense of, allows the
/// crawl. The checker itself must never be the reason a site is skipped.
pub struct RobotsChecker {
    client: Client,
    cache: CrawlCache,
}

impl RobotsChecker {
    pub fn new(cache: CrawlCache) -> Self {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(ROBOTS_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, cache }
    }

    pub async fn is_allowed(&self, url: &str, polite_delay: Duration) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return true;
        };
        let Some(host) = parsed.host_str() else {
            return true;
        };

        let origin = match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        };

        let content = self.robots_content(&origin, polite_delay).await;
        if content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&content, ROBOTS_USER_AGENT, url)
    }

    /// robots.txt body for an origin, empty meaning "no policy". Fetches are
    /// preceded by the polite sleep; results land in the robots cache either
    /// way so a host is asked at most once per TTL window.
    async fn robots_content(&self, origin: &str, polite_delay: Duration) -> String {
        if let Some(cached) = self.cache.get_fresh(CacheKind::Robots, origin).await {
            return cached;
        }

        tokio::time::sleep(polite_delay).await;

        let robots_url = format!("{}/robots.txt", origin);
        debug!("🤖 Fetching robots policy: {}", robots_url);
        let content = match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => {
                response.text().await.unwrap_or_default()
            }
            Ok(response) => {
                debug!("robots.txt returned {} for {}", response.status(), origin);
                String::new()
            }
            Err(e) => {
                warn!("robots.txt fetch failed for {}: {}", origin, e);
                String::new()
            }
        };

        self.cache.put(CacheKind::Robots, origin, &content).await;
        content
    }
}
