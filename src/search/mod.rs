pub mod aggregator;
pub mod bing;
pub mod duckduckgo;
pub mod google;

pub use aggregator::{merge_and_deduplicate, SearchAggregator};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of the engine that contributed a result. Declaration order is
/// the precedence order used when duplicate URLs collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    DuckDuckGo,
    Bing,
    Google,
}

impl Engine {
    /// Lower value wins duplicate-URL conflicts.
    pub fn precedence(&self) -> usize {
        match self {
            Engine::DuckDuckGo => 0,
            Engine::Bing => 1,
            Engine::Google => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::DuckDuckGo => "duckduckgo",
            Engine::Bing => "bing",
            Engine::Google => "google",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One external search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub engine: Engine,
}

/// Contract shared by the per-engine fetchers: sleep the polite delay, issue
/// one request, parse engine-specific markup, cap at `max_results`, and
/// swallow every fetch or parse error into an empty list.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    fn id(&self) -> Engine;

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        polite_delay: Duration,
    ) -> Vec<SearchHit>;
}

/// HTTP client with the fixed browser identity all engines share.
pub(crate) fn search_client() -> Client {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(crate::ACCEPT_LANGUAGE),
    );

    Client::builder()
        .user_agent(crate::USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(15))
        .build()
        .expect("Failed to create HTTP client")
}
