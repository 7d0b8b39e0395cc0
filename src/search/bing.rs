use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

use crate::search::{search_client, Engine, SearchEngine, SearchHit};

const SEARCH_ENDPOINT: &str = "https://www.bing.com/search";

/// Bing web search, scraped from the `b_algo` result blocks with a fallback
/// scan over plain absolute-URL anchors when the page yields too few.
pub struct Bing {
    client: Client,
}

impl Bing {
    pub fn new() -> Self {
        Self {
            client: search_client(),
        }
    }
}

impl Default for Bing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for Bing {
    fn id(&self) -> Engine {
        Engine::Bing
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        polite_delay: Duration,
    ) -> Vec<SearchHit> {
        tokio::time::sleep(polite_delay).await;

        let response = match self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[("q", query), ("count", &max_results.to_string())])
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Bing returned {} for '{}'", response.status(), query);
                return Vec::new();
            }
            Err(e) => {
                warn!("Bing request failed for '{}': {}", query, e);
                return Vec::new();
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read Bing response: {}", e);
                return Vec::new();
            }
        };

        let hits = parse_results(&body, max_results);
        debug!("Bing: {} hits for '{}'", hits.len(), query);
        hits
    }
}

fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let primary_selector = Selector::parse("li.b_algo h2 a").unwrap();

    let mut seen: HashSet<String> = HashSet::new();
    let mut hits = Vec::new();

    for anchor in document.select(&primary_selector) {
        if hits.len() >= max_results {
            return hits;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let title = anchor.text().collect::<String>().trim().to_string();
        if href.is_empty() || title.is_empty() || !seen.insert(href.to_string()) {
            continue;
        }
        hits.push(SearchHit {
            title,
            link: href.to_string(),
            engine: Engine::Bing,
        });
    }

    // Markup changes often; fall back to any absolute link with visible text.
    if hits.len() < max_results {
        let anchor_selector = Selector::parse("a[href]").unwrap();
        for anchor in document.select(&anchor_selector) {
            if hits.len() >= max_results {
                break;
            }
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.starts_with("http://") && !href.starts_with("https://") {
                continue;
            }
            let title = anchor.text().collect::<String>().trim().to_string();
            if title.is_empty() || !seen.insert(href.to_string()) {
                continue;
            }
            hits.push(SearchHit {
                title,
                link: href.to_string(),
                engine: Engine::Bing,
            });
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_primary_result_blocks() {
        let html = r#"
            <ol>
              <li class="b_algo"><h2><a href="https://one.example.com">One Co</a></h2></li>
              <li class="b_algo"><h2><a href="https://two.example.com">Two Co</a></h2></li>
            </ol>
            <a href="https://ad.example.com">Sponsored</a>
        "#;
        let hits = parse_results(html, 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].link, "https://one.example.com");
        assert_eq!(hits[1].title, "Two Co");
    }

    #[test]
    fn falls_back_to_absolute_anchors_when_short() {
        let html = r#"
            <li class="b_algo"><h2><a href="https://one.example.com">One Co</a></h2></li>
            <a href="/relative">Relative</a>
            <a href="https://extra.example.com">Extra Co</a>
            <a href="https://one.example.com">One Co again</a>
        "#;
        let hits = parse_results(html, 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].link, "https://extra.example.com");
    }
}
