use std::sync::Arc;
use tracing::info;

use crate::cache::{create_cache_pool, CrawlCache};
use crate::config::Config;
use crate::crawler::SiteCrawler;
use crate::filter::DomainFilter;
use crate::models::{CliApp, Result};
use crate::pipeline::LeadPipeline;
use crate::search::SearchAggregator;
use crate::verifier::{DnsMxResolver, EmailVerifier, MxResolver, NullMxResolver};

#[derive(Debug, Clone)]
pub enum MenuAction {
    FindLeads,
    ShowLeads,
    ExportLeadsCsv,
    BuildEmailDrafts,
    ShowCacheStats,
    ClearLeads,
    Exit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::FindLeads => write!(f, "🔎 Find leads (search + crawl)"),
            MenuAction::ShowLeads => write!(f, "📋 Show collected leads"),
            MenuAction::ExportLeadsCsv => write!(f, "📤 Export leads to CSV"),
            MenuAction::BuildEmailDrafts => write!(f, "✉️  Build email drafts CSV"),
            MenuAction::ShowCacheStats => write!(f, "📊 Show cache statistics"),
            MenuAction::ClearLeads => write!(f, "🗑️  Clear collected leads"),
            MenuAction::Exit => write!(f, "🚪 Exit"),
        }
    }
}

impl CliApp {
    pub async fn new(config: Config) -> Result<Self> {
        let pool = create_cache_pool(&config.output.cache_db).await?;
        let cache = CrawlCache::new(pool);

        // DNS is optional; without it MX checks degrade to "unverified".
        let resolver: Arc<dyn MxResolver> = if config.verification.check_mx {
            Arc::new(DnsMxResolver::new())
        } else {
            Arc::new(NullMxResolver)
        };

        let verifier = EmailVerifier::new(resolver);
        let crawler = SiteCrawler::new(cache.clone(), verifier);
        let aggregator = SearchAggregator::from_ids(&config.search.engines);
        let filter = DomainFilter::new(
            config.filters.allow_domains.clone(),
            config.filters.deny_domains.clone(),
        );
        let pipeline = LeadPipeline::new(aggregator, crawler, filter);

        info!(
            "Configured {} queries across {} engines",
            config.search.queries.len(),
            config.search.engines.len()
        );

        Ok(Self {
            config,
            cache,
            pipeline,
            leads: Vec::new(),
        })
    }
}
