use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

use crate::search::{search_client, Engine, SearchEngine, SearchHit};

const RESULTS_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo's non-JS HTML results page, queried with a form POST.
pub struct DuckDuckGo {
    client: Client,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self {
            client: search_client(),
        }
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for DuckDuckGo {
    fn id(&self) -> Engine {
        Engine::DuckDuckGo
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
            .post(RESULTS_ENDPOINT)
            .form(&[("q", query)])
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("DuckDuckGo returned {} for '{}'", response.status(), query);
                return Vec::new();
            }
            Err(e) => {
                warn!("DuckDuckGo request failed for '{}': {}", query, e);
                return Vec::new();
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read DuckDuckGo response: {}", e);
                return Vec::new();
            }
        };

        let hits = parse_results(&body, max_results);
        debug!("DuckDuckGo: {} hits for '{}'", hits.len(), query);
        hits
    }
}

fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a.result__a").unwrap();

    let mut hits = Vec::new();
    for anchor in document.select(&anchor_selector) {
        if hits.len() >= max_results {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let title = anchor.text().collect::<String>().trim().to_string();
        if href.is_empty() || title.is_empty() {
            continue;
        }
        hits.push(SearchHit {
            title,
            link: href.to_string(),
            engine: Engine::DuckDuckGo,
        });
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primary_result_anchors() {
        let html = r#"
            <html><body>
              <a class="result__a" href="https://one.example.com">One Co</a>
              <a class="other" href="https://skip.example.com">Skip</a>
              <a class="result__a" href="https://two.example.com"> Two Co </a>
            </body></html>
        "#;
        let hits = parse_results(html, 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].link, "https://one.example.com");
        assert_eq!(hits[1].title, "Two Co");
    }

    #[test]
    fn caps_at_max_results() {
        let html = r#"
            <a class="result__a" href="https://a.com">A</a>
            <a class="result__a" href="https://b.com">B</a>
            <a class="result__a" href="https://c.com">C</a>
        "#;
        assert_eq!(parse_results(html, 2).len(), 2);
    }
}
