use serde::{Deserialize, Serialize};

use crate::{cache::CrawlCache, config::Config, pipeline::LeadPipeline, search::Engine};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Outcome of email verification for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailVerified {
    /// Syntax valid and the domain has MX records.
    Yes,
    /// Syntax valid; MX checking was turned off.
    SyntaxOnly,
    /// No address passed verification.
    No,
}

impl std::fmt::Display for EmailVerified {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailVerified::Yes => write!(f, "Yes"),
            EmailVerified::SyntaxOnly => write!(f, "SyntaxOnly"),
            EmailVerified::No => write!(f, "No"),
        }
    }
}

/// One candidate business contact produced by the pipeline.
/// Unique on (email, website) within the accumulated collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub company: String,
    pub email: String,
    pub website: String,
    pub phone: String,
    pub source: Engine,
    pub email_verified: EmailVerified,
    pub mx_domain: String,
}

/// Raw body of a fetched page, whether it came from the network or the cache.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub body: String,
}

pub struct CliApp {
    pub config: Config,
    pub cache: CrawlCache,
    pub pipeline: LeadPipeline,
    /// Append-only across runs; the pipeline never touches it directly.
    pub leads: Vec<Lead>,
}
