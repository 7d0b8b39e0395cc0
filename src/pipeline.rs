use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::crawler::SiteCrawler;
use crate::filter::{looks_like_competitor, DomainFilter};
use crate::models::{EmailVerified, Lead};
use crate::search::{merge_and_deduplicate, SearchAggregator};

/// Pause between successive queries, on top of per-request polite delays.
const INTER_QUERY_DELAY: Duration = Duration::from_millis(400);

/// Everything one pipeline run needs, passed explicitly; the pipeline holds
/// no state of its own between runs.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub queries: Vec<String>,
    pub max_results: usize,
    pub polite_delay: Duration,
    pub verify_mx: bool,
    pub include_competitors: bool,
}

pub struct LeadPipeline {
    aggregator: SearchAggregator,
    crawler: SiteCrawler,
    filter: DomainFilter,
}

impl LeadPipeline {
    pub fn new(aggregator: SearchAggregator, crawler: SiteCrawler, filter: DomainFilter) -> Self {
        Self {
            aggregator,
            crawler,
            filter,
        }
    }

    /// Searches, filters, and crawls every query in `settings`, returning
    /// the new leads. `existing` seeds (email, website) uniqueness so reruns
    /// never duplicate leads the caller already holds.
    pub async fn run(&self, settings: &RunSettings, existing: &[Lead]) -> Vec<Lead> {
        let mut seen: HashSet<(String, String)> = existing
            .iter()
            .map(|lead| (lead.email.clone(), lead.website.clone()))
            .collect();

        let mut all_hits = Vec::new();
        let total = settings.queries.len();
        for (i, query) in settings.queries.iter().enumerate() {
            info!("🔎 Query {}/{}: {}", i + 1, total, query);
            let hits = self
                .aggregator
                .search(query, settings.max_results, settings.polite_delay)
                .await;
            all_hits.extend(hits);
            if i + 1 < total {
                tokio::time::sleep(INTER_QUERY_DELAY).await;
            }
        }

        // Queries overlap; collapse duplicates once more across all of them.
        let hits = merge_and_deduplicate(all_hits);
        info!("🧭 {} candidate sites to crawl", hits.len());

        let mut leads = Vec::new();
        for hit in hits {
            let url = normalize_url(&hit.link);
            if !url.starts_with("http://") && !url.starts_with("https://") {
                continue;
            }
            if !self.filter.is_allowed(&url) {
                debug!("Domain filter rejected {}", url);
                continue;
            }

            let Some(homepage) = self.crawler.fetch_page(&url).await else {
                continue;
            };
            let company = self.crawler.company_name(&homepage.body, &url);
            if !settings.include_competitors && looks_like_competitor(&company) {
                debug!("Skipping competitor: {}", company);
                continue;
            }

            let outcome = self
                .crawler
                .crawl(&url, settings.polite_delay, settings.verify_mx)
                .await;
            let Some(email) = outcome.emails.first().cloned() else {
                continue;
            };

            if !seen.insert((email.clone(), url.clone())) {
                continue;
            }

            let email_verified = match (outcome.any_verified, settings.verify_mx) {
                (true, true) => EmailVerified::Yes,
                (true, false) => EmailVerified::SyntaxOnly,
                (false, _) => EmailVerified::No,
            };

            info!("✅ Lead: {} <{}>", company, email);
            leads.push(Lead {
                company,
                email,
                website: url,
                phone: outcome.phone,
                source: hit.engine,
                email_verified,
                mx_domain: outcome.mx_domain,
            });
        }

        info!("🏁 Run complete: {} new leads", leads.len());
        leads
    }
}

/// Search engines occasionally emit scheme-less links; default them to http.
pub fn normalize_url(link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else if let Some(rest) = link.strip_prefix("//") {
        format!("https://{}", rest)
    } else if Url::parse(link).is_ok() {
        link.to_string()
    } else {
        format!("http://{}", link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_defaults_missing_schemes() {
        assert_eq!(normalize_url("example.com"), "http://example.com");
        assert_eq!(normalize_url("//cdn.example.com/x"), "https://cdn.example.com/x");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("mailto:x@y.com"), "mailto:x@y.com");
    }
}
