use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// One syntactically plausible `local@domain.tld` address.
pub const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

/// Mail-exchange lookup capability, selected once at startup.
#[async_trait]
pub trait MxResolver: Send + Sync {
    /// Whether the domain publishes at least one MX record. Any lookup
    /// failure reports `false`; deliverability checks are best effort.
    async fn has_records(&self, domain: &str) -> bool;
}

/// Real DNS-backed resolver.
pub struct DnsMxResolver {
    resolver: TokioAsyncResolver,
}

impl DnsMxResolver {
    pub fn new() -> Self {
        let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                warn!("System DNS config unavailable ({}), using defaults", e);
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }
        };
        Self { resolver }
    }
}

impl Default for DnsMxResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MxResolver for DnsMxResolver {
    async fn has_records(&self, domain: &str) -> bool {
        match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => lookup.iter().next().is_some(),
            Err(e) => {
                debug!("MX lookup failed for {}: {}", domain, e);
                false
            }
        }
    }
}

/// Stand-in for environments without DNS access: every lookup fails,
/// so MX verification degrades to "could not verify".
pub struct NullMxResolver;

#[async_trait]
impl MxResolver for NullMxResolver {
    async fn has_records(&self, _domain: &str) -> bool {
        false
    }
}

pub struct EmailVerifier {
    syntax: Regex,
    resolver: Arc<dyn MxResolver>,
}

impl EmailVerifier {
    pub fn new(resolver: Arc<dyn MxResolver>) -> Self {
        Self {
            syntax: Regex::new(&format!("^{}$", EMAIL_PATTERN)).unwrap(),
            resolver,
        }
    }

    /// Returns whether the address passes verification and, when MX checking
    /// ran, the domain that was looked up.
    pub async fn verify(&self, email: &str, do_mx: bool) -> (bool, String) {
        if !self.syntax.is_match(email) {
            return (false, String::new());
        }
        if !do_mx {
            return (true, String::new());
        }

        let domain = email.split('@').nth(1).unwrap_or("").to_string();
        let ok = self.resolver.has_records(&domain).await;
        (ok, domain)
    }
}
