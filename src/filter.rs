use url::Url;

/// Substrings that mark a company name as a flooring competitor.
pub const COMPETITOR_WORDS: [&str; 3] = ["floor", "tile", "carpet"];

/// Allow/deny host-suffix rules applied to candidate URLs before crawling.
/// Deny always wins; an empty allow list accepts everything not denied.
#[derive(Debug, Clone, Default)]
pub struct DomainFilter {
    allow: Vec<String>,
    deny: Vec<String>,
}

impl DomainFilter {
    pub fn new(allow: Vec<String>, deny: Vec<String>) -> Self {
        let lower = |list: Vec<String>| -> Vec<String> {
            list.into_iter().map(|s| s.to_lowercase()).collect()
        };
        Self {
            allow: lower(allow),
            deny: lower(deny),
        }
    }

    pub fn is_allowed(&self, url: &str) -> bool {
        let host = match Url::parse(url) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => host.to_lowercase(),
                None => return false,
            },
            Err(_) => return false,
        };

        if self.deny.iter().any(|suffix| host.ends_with(suffix)) {
            return false;
        }
        if !self.allow.is_empty() {
            return self.allow.iter().any(|suffix| host.ends_with(suffix));
        }
        true
    }
}

pub fn looks_like_competitor(name: &str) -> bool {
    let name = name.to_lowercase();
    COMPETITOR_WORDS.iter().any(|word| name.contains(word))
}
