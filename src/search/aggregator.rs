use std::collections::HashMap;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::search::{
    bing::Bing, duckduckgo::DuckDuckGo, google::Google, Engine, SearchEngine, SearchHit,
};

/// Queries every configured engine in turn and merges the results.
pub struct SearchAggregator {
    engines: Vec<Box<dyn SearchEngine>>,
}

impl SearchAggregator {
    pub fn new(engines: Vec<Box<dyn SearchEngine>>) -> Self {
        Self { engines }
    }

    pub fn from_ids(ids: &[Engine]) -> Self {
        let engines = ids
            .iter()
            .map(|id| -> Box<dyn SearchEngine> {
                match id {
                    Engine::DuckDuckGo => Box::new(DuckDuckGo::new()),
                    Engine::Bing => Box::new(Bing::new()),
                    Engine::Google => Box::new(Google::new()),
                }
            })
            .collect();
        Self::new(engines)
    }

    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        polite_delay: Duration,
    ) -> Vec<SearchHit> {
        let mut all_hits = Vec::new();
        for engine in &self.engines {
            let hits = engine.search(query, max_results, polite_delay).await;
            info!("🔎 {}: {} hits for '{}'", engine.id(), hits.len(), query);
            all_hits.extend(hits);
        }
        merge_and_deduplicate(all_hits)
    }
}

/// Normalized (scheme, lowercased host, path) triple used as the
/// cross-engine deduplication key.
fn dedup_key(link: &str) -> String {
    match Url::parse(link) {
        Ok(url) => format!(
            "{}://{}{}",
            url.scheme(),
            url.host_str().unwrap_or("").to_lowercase(),
            url.path()
        ),
        Err(_) => link.to_string(),
    }
}

/// Collapses hits sharing a dedup key. The first occurrence of a key fixes
/// the output position; a later duplicate replaces the kept hit in place
/// only when its engine ranks strictly higher in the precedence order.
pub fn merge_and_deduplicate(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut order: Vec<String> = Vec::new();
    let mut kept: HashMap<String, SearchHit> = HashMap::new();

    for hit in hits {
        let key = dedup_key(&hit.link);
        match kept.get_mut(&key) {
            Some(existing) => {
                if hit.engine.precedence() < existing.engine.precedence() {
                    *existing = hit;
                }
            }
            None => {
                order.push(key.clone());
                kept.insert(key, hit);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| kept.remove(&key))
        .collect()
}
