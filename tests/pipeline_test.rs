use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lead_finder::cache::{create_cache_pool, CrawlCache};
use lead_finder::crawler::SiteCrawler;
use lead_finder::filter::DomainFilter;
use lead_finder::models::EmailVerified;
use lead_finder::pipeline::{LeadPipeline, RunSettings};
use lead_finder::search::{Engine, SearchAggregator, SearchEngine, SearchHit};
use lead_finder::verifier::{EmailVerifier, NullMxResolver};

/// Engine that "finds" a fixed set of result links.
struct StubEngine {
    hits: Vec<SearchHit>,
}

#[async_trait]
impl SearchEngine for StubEngine {
    fn id(&self) -> Engine {
        Engine::DuckDuckGo
    }

    async fn search(
        &self,
        _query: &str,
        max_results: usize,
        _polite_delay: Duration,
    ) -> Vec<SearchHit> {
        self.hits.iter().take(max_results).cloned().collect()
    }
}

async fn pipeline_for(dir: &tempfile::TempDir, target: &str, filter: DomainFilter) -> LeadPipeline {
    let db_path = dir.path().join("cache.db");
    let pool = create_cache_pool(db_path.to_str().unwrap()).await.unwrap();
    let cache = CrawlCache::new(pool);

    let verifier = EmailVerifier::new(Arc::new(NullMxResolver));
    let crawler = SiteCrawler::new(cache, verifier);

    let stub = StubEngine {
        hits: vec![SearchHit {
            title: "Example Co".to_string(),
            link: target.to_string(),
            engine: Engine::DuckDuckGo,
        }],
    };
    let aggregator = SearchAggregator::new(vec![Box::new(stub) as Box<dyn SearchEngine>]);

    LeadPipeline::new(aggregator, crawler, filter)
}

fn settings(include_competitors: bool) -> RunSettings {
    RunSettings {
        queries: vec!["Flooring contractors Miami".to_string()],
        max_results: 10,
        polite_delay: Duration::ZERO,
        verify_mx: false,
        include_competitors,
    }
}

async fn mount_company_site(server: &MockServer, title: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><head><title>{}</title></head>\
             <body>Contact us at info@example.com or (305) 555-1234</body></html>",
            title
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn stub_search_produces_one_lead() {
    let server = MockServer::start().await;
    mount_company_site(&server, "Example Co").await;

    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_for(&dir, &server.uri(), DomainFilter::default()).await;

    let leads = pipeline.run(&settings(true), &[]).await;

    assert_eq!(leads.len(), 1);
    let lead = &leads[0];
    assert_eq!(lead.company, "Example Co");
    assert_eq!(lead.email, "info@example.com");
    assert_eq!(lead.phone, "(305) 555-1234");
    assert_eq!(lead.website, server.uri());
    assert_eq!(lead.source, Engine::DuckDuckGo);
    assert_eq!(lead.email_verified, EmailVerified::SyntaxOnly);
    assert_eq!(lead.mx_domain, "");
}

#[tokio::test]
async fn reruns_do_not_duplicate_existing_leads() {
    let server = MockServer::start().await;
    mount_company_site(&server, "Example Co").await;

    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_for(&dir, &server.uri(), DomainFilter::default()).await;

    let first = pipeline.run(&settings(true), &[]).await;
    assert_eq!(first.len(), 1);

    let second = pipeline.run(&settings(true), &first).await;
    assert!(second.is_empty());
}

#[tokio::test]
async fn competitor_names_are_excluded_on_request() {
    let server = MockServer::start().await;
    mount_company_site(&server, "Miami Tile and Flooring").await;

    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_for(&dir, &server.uri(), DomainFilter::default()).await;

    assert!(pipeline.run(&settings(false), &[]).await.is_empty());
    assert_eq!(pipeline.run(&settings(true), &[]).await.len(), 1);
}

#[tokio::test]
async fn denied_domains_are_never_crawled() {
    let server = MockServer::start().await;
    mount_company_site(&server, "Example Co").await;

    let dir = tempfile::tempdir().unwrap();
    let filter = DomainFilter::new(vec![], vec!["127.0.0.1".to_string()]);
    let pipeline = pipeline_for(&dir, &server.uri(), filter).await;

    assert!(pipeline.run(&settings(true), &[]).await.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}
