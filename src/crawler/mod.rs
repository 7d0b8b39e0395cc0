pub mod extractor;
pub mod fetcher;
pub mod robots;

use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::{CacheKind, ContactSet, CrawlCache};
use crate::crawler::extractor::ContactExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::robots::RobotsChecker;
use crate::models::PageContent;
use crate::verifier::EmailVerifier;

/// What a crawl of one site produced. When any address verified, `emails`
/// holds only the verified subset; otherwise the full unverified set.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub emails: Vec<String>,
    pub phone: String,
    pub any_verified: bool,
    pub mx_domain: String,
}

/// Crawls a homepage plus its likely contact pages, honoring robots.txt and
/// the persistent cache, then runs email verification over the result.
pub struct SiteCrawler {
    fetcher: PageFetcher,
    robots: RobotsChecker,
    extractor: ContactExtractor,
    verifier: EmailVerifier,
    cache: CrawlCache,
}

impl SiteCrawler {
    pub fn new(cache: CrawlCache, verifier: EmailVerifier) -> Self {
        Self {
            fetcher: PageFetcher::new(cache.clone()),
            robots: RobotsChecker::new(cache.clone()),
            extractor: ContactExtractor::new(),
            verifier,
            cache,
        }
    }

    /// Cache-first page fetch, exposed for the pipeline's company-name pass.
    pub async fn fetch_page(&self, url: &str) -> Option<PageContent> {
        self.fetcher.get(url).await
    }

    pub fn company_name(&self, html: &str, url: &str) -> String {
        self.extractor.company_name(html, url)
    }

    pub async fn crawl(
        &self,
        start_url: &str,
        polite_delay: Duration,
        verify_mx: bool,
    ) -> CrawlOutcome {
        // A fresh contact set skips all fetching, but verification always
        // re-runs: its outcome depends on the current MX toggle, not on
        // page content.
        if let Some(payload) = self.cache.get_fresh(CacheKind::ContactSets, start_url).await {
            if let Ok(cached) = serde_json::from_str::<ContactSet>(&payload) {
                info!("📦 Using cached contact set for {}", start_url);
                return self
                    .verified_outcome(cached.emails.into_iter().collect(), cached.phone, verify_mx)
                    .await;
            }
        }

        if !self.robots.is_allowed(start_url, polite_delay).await {
            info!("🤖 robots.txt disallows {}", start_url);
            return CrawlOutcome::default();
        }

        let Some(homepage) = self.fetcher.get(start_url).await else {
            debug!("Homepage unavailable: {}", start_url);
            return CrawlOutcome::default();
        };

        let mut emails: BTreeSet<String> =
            self.extractor.emails(&homepage.body).into_iter().collect();
        let mut phone = self.extractor.phone(&homepage.body);

        for contact_url in self.extractor.likely_contact_pages(start_url, &homepage.body) {
            if !self.robots.is_allowed(&contact_url, polite_delay).await {
                debug!("robots.txt disallows contact page {}", contact_url);
                continue;
            }
            tokio::time::sleep(polite_delay).await;
            let Some(page) = self.fetcher.get(&contact_url).await else {
                continue;
            };
            emails.extend(self.extractor.emails(&page.body));
            let found = self.extractor.phone(&page.body);
            if !found.is_empty() {
                phone = found;
            }
        }

        info!(
            "🕷️  Crawled {}: {} emails, phone {:?}",
            start_url,
            emails.len(),
            phone
        );

        let contact_set = ContactSet {
            emails: emails.iter().cloned().collect(),
            phone: phone.clone(),
        };
        if let Ok(payload) = serde_json::to_string(&contact_set) {
            self.cache
                .put(CacheKind::ContactSets, start_url, &payload)
                .await;
        }

        self.verified_outcome(emails, phone, verify_mx).await
    }

    async fn verified_outcome(
        &self,
        emails: BTreeSet<String>,
        phone: String,
        verify_mx: bool,
    ) -> CrawlOutcome {
        let mut verified = BTreeSet::new();
        let mut mx_domain = String::new();

        for email in &emails {
            let (ok, domain) = self.verifier.verify(email, verify_mx).await;
            if !domain.is_empty() {
                mx_domain = domain;
            }
            if ok {
                verified.insert(email.clone());
            }
        }

        let any_verified = !verified.is_empty();
        let emails = if any_verified { verified } else { emails };

        CrawlOutcome {
            emails: emails.into_iter().collect(),
            phone,
            any_verified,
            mx_domain,
        }
    }
}
