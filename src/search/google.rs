use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::search::{search_client, Engine, SearchEngine, SearchHit};

const SEARCH_ENDPOINT: &str = "https://www.google.com/search";

/// Google web search. Google may answer with a consent interstitial instead
/// of results; the form is resubmitted once with all of its fields before
/// parsing. Result links come as `/url?q=...` redirect anchors.
pub struct Google {
    client: Client,
}

impl Google {
    pub fn new() -> Self {
        Self {
            client: search_client(),
        }
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchEngine for Google {
    fn id(&self) -> Engine {
        Engine::Google
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
            .query(&[("q", query), ("num", &max_results.to_string()), ("hl", "en")])
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Google returned {} for '{}'", response.status(), query);
                return Vec::new();
            }
            Err(e) => {
                warn!("Google request failed for '{}': {}", query, e);
                return Vec::new();
            }
        };

        let final_url = response.url().clone();
        let mut body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read Google response: {}", e);
                return Vec::new();
            }
        };

        if is_consent_page(&final_url, &body) {
            info!("Google consent interstitial, resubmitting form");
            match parse_consent_form(&body, &final_url) {
                Some((action, fields)) => {
                    body = match self.submit_consent(&action, &fields).await {
                        Some(body) => body,
                        None => return Vec::new(),
                    };
                }
                None => {
                    warn!("Could not locate Google consent form");
                    return Vec::new();
                }
            }
        }

        let hits = parse_results(&body, max_results);
        debug!("Google: {} hits for '{}'", hits.len(), query);
        hits
    }
}

impl Google {
    async fn submit_consent(&self, action: &str, fields: &[(String, String)]) -> Option<String> {
        let response = match self.client.post(action).form(fields).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Google consent form returned {}", response.status());
                return None;
            }
            Err(e) => {
                warn!("Google consent submission failed: {}", e);
                return None;
            }
        };
        response.text().await.ok()
    }
}

fn is_consent_page(final_url: &Url, body: &str) -> bool {
    final_url
        .host_str()
        .map(|host| host.contains("consent.google"))
        .unwrap_or(false)
        || body.contains("consent.google.com")
}

/// Action URL (resolved against the page URL) plus every input field of the
/// consent form.
fn parse_consent_form(html: &str, base: &Url) -> Option<(String, Vec<(String, String)>)> {
    let document = Html::parse_document(html);
    let form_selector = Selector::parse("form").unwrap();
    let input_selector = Selector::parse("input[name]").unwrap();

    let forms: Vec<_> = document.select(&form_selector).collect();
    let form = forms
        .iter()
        .find(|form| {
            form.value()
                .attr("action")
                .map(|action| action.contains("consent"))
                .unwrap_or(false)
        })
        .or_else(|| forms.first())?;

    let action = form.value().attr("action")?;
    let action = base.join(action).ok()?.to_string();

    let fields = form
        .select(&input_selector)
        .filter_map(|input| {
            let name = input.value().attr("name")?.to_string();
            let value = input.value().attr("value").unwrap_or("").to_string();
            Some((name, value))
        })
        .collect();

    Some((action, fields))
}

fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let mut seen: HashSet<String> = HashSet::new();
    let mut hits = Vec::new();

    // Redirect anchors carry the real target in their q parameter.
    for anchor in document.select(&anchor_selector) {
        if hits.len() >= max_results {
            return hits;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.starts_with("/url?") {
            continue;
        }
        let Some(target) = redirect_target(href) else {
            continue;
        };
        let mut title = anchor.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            title = target.clone();
        }
        if seen.insert(target.clone()) {
            hits.push(SearchHit {
                title,
                link: target,
                engine: Engine::Google,
            });
        }
    }

    if hits.len() < max_results {
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
                engine: Engine::Google,
            });
        }
    }

    hits
}

fn redirect_target(href: &str) -> Option<String> {
    let resolved = Url::parse("https://www.google.com").ok()?.join(href).ok()?;
    let target = resolved
        .query_pairs()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())?;
    if target.starts_with("http://") || target.starts_with("https://") {
        Some(target)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_redirect_targets_first() {
        let html = r#"
            <a href="/url?q=https://one.example.com/page&sa=U"><h3>One Co</h3></a>
            <a href="/url?q=/relative&sa=U">Not absolute</a>
            <a href="https://maps.google.com">Maps</a>
        "#;
        let hits = parse_results(html, 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].link, "https://one.example.com/page");
        assert_eq!(hits[0].title, "One Co");
    }

    #[test]
    fn falls_back_to_absolute_anchors() {
        let html = r#"
            <a href="/url?q=https://one.example.com&sa=U">One Co</a>
            <a href="https://two.example.com">Two Co</a>
        "#;
        let hits = parse_results(html, 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].link, "https://two.example.com");
    }

    #[test]
    fn consent_form_yields_action_and_fields() {
        let html = r#"
            <form action="https://consent.google.com/save" method="post">
              <input type="hidden" name="continue" value="https://www.google.com/search?q=x">
              <input type="hidden" name="gl" value="US">
              <input type="submit" value="Accept">
            </form>
        "#;
        let base = Url::parse("https://consent.google.com/m?continue=x").unwrap();
        let (action, fields) = parse_consent_form(html, &base).unwrap();
        assert_eq!(action, "https://consent.google.com/save");
        assert!(fields
            .iter()
            .any(|(name, value)| name == "gl" && value == "US"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn consent_detection_matches_host_or_body() {
        let consent_url = Url::parse("https://consent.google.com/m").unwrap();
        let results_url = Url::parse("https://www.google.com/search").unwrap();
        assert!(is_consent_page(&consent_url, ""));
        assert!(is_consent_page(
            &results_url,
            r#"<form action="https://consent.google.com/save">"#
        ));
        assert!(!is_consent_page(&results_url, "<html>results</html>"));
    }
}
