use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

use crate::verifier::EMAIL_PATTERN;

/// Matches ending in these are filename-shaped false positives from asset
/// paths, not addresses.
pub const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".webp"];

const CONTACT_HINTS: [&str; 4] = ["contact", "contact-us", "about", "team"];
const FALLBACK_SUFFIXES: [&str; 3] = ["/contact", "/contact-us", "/about"];
const MAX_CONTACT_PAGES: usize = 6;
const MAX_COMPANY_NAME: usize = 120;

/// Best-effort extraction of company names, emails, and phone numbers from
/// raw page content.
pub struct ContactExtractor {
    email_re: Regex,
    phone_re: Regex,
}

impl ContactExtractor {
    pub fn new() -> Self {
        Self {
            // Group 1 is the address, group 2 any trailing path segment; the
            // path is kept only to recognize asset URLs like
            // logo@cdn.example.com/logo.png.
            email_re: Regex::new(&format!(r#"\b({})((?:/[^\s"'<>]*)?)"#, EMAIL_PATTERN)).unwrap(),
            phone_re: Regex::new(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b")
                .unwrap(),
        }
    }

    /// Company name from page structure: og:site_name, og:title, first
    /// heading, then document title; falls back to the host with a leading
    /// `www.` stripped.
    pub fn company_name(&self, html: &str, url: &str) -> String {
        let document = Html::parse_document(html);

        let meta_candidates = [
            r#"meta[property="og:site_name"]"#,
            r#"meta[property="og:title"]"#,
        ];
        for selector in meta_candidates {
            let selector = Selector::parse(selector).unwrap();
            if let Some(element) = document.select(&selector).next() {
                if let Some(content) = element.value().attr("content") {
                    let text = content.trim();
                    if !text.is_empty() {
                        return truncate(text, MAX_COMPANY_NAME);
                    }
                }
            }
        }

        for selector in ["h1", "title"] {
            let selector = Selector::parse(selector).unwrap();
            if let Some(element) = document.select(&selector).next() {
                let text = element.text().collect::<String>();
                let text = text.trim();
                if !text.is_empty() {
                    return truncate(text, MAX_COMPANY_NAME);
                }
            }
        }

        match Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
            Some(host) => {
                let host = host.to_lowercase();
                host.strip_prefix("www.").unwrap_or(&host).to_string()
            }
            None => String::new(),
        }
    }

    /// First North-American phone number in the content, or empty.
    pub fn phone(&self, content: &str) -> String {
        self.phone_re
            .find(content)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }

    /// All plausible addresses, lowercased, sorted, deduplicated, with
    /// image-asset lookalikes removed.
    pub fn emails(&self, content: &str) -> Vec<String> {
        let mut emails = BTreeSet::new();
        for captures in self.email_re.captures_iter(content) {
            let email = captures[1].to_lowercase();
            let tail = captures
                .get(2)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default();
            let shaped = format!("{}{}", email, tail);
            if IMAGE_EXTENSIONS.iter().any(|ext| shaped.ends_with(ext)) {
                continue;
            }
            emails.insert(email);
        }
        emails.into_iter().collect()
    }

    /// Up to six URLs likely to hold contact details: in-page links whose
    /// href hints at a contact section, plus the common fixed suffixes.
    pub fn likely_contact_pages(&self, base_url: &str, html: &str) -> Vec<String> {
        let Ok(base) = Url::parse(base_url) else {
            return Vec::new();
        };

        let mut seen = BTreeSet::new();
        let mut pages = Vec::new();
        let push = |resolved: Url, pages: &mut Vec<String>, seen: &mut BTreeSet<String>| {
            let resolved = resolved.to_string();
            if pages.len() < MAX_CONTACT_PAGES && seen.insert(resolved.clone()) {
                pages.push(resolved);
            }
        };

        let document = Html::parse_document(html);
        let anchor_selector = Selector::parse("a[href]").unwrap();
        for anchor in document.select(&anchor_selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let href_lower = href.to_lowercase();
            if !CONTACT_HINTS.iter().any(|hint| href_lower.contains(hint)) {
                continue;
            }
            if let Ok(resolved) = base.join(href) {
                push(resolved, &mut pages, &mut seen);
            }
        }

        for suffix in FALLBACK_SUFFIXES {
            if let Ok(resolved) = base.join(suffix) {
                push(resolved, &mut pages, &mut seen);
            }
        }

        pages
    }
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_drop_image_asset_lookalikes() {
        let extractor = ContactExtractor::new();
        let emails = extractor
            .emails("contact: sales@example.com, see logo@cdn.example.com/logo.png");
        assert_eq!(emails, vec!["sales@example.com".to_string()]);
    }

    #[test]
    fn emails_drop_filename_shaped_matches() {
        let extractor = ContactExtractor::new();
        assert!(extractor.emails("icon@2x.png header@hero.webp").is_empty());
        assert_eq!(
            extractor.emails("write to Sales@Example.COM or sales@example.com"),
            vec!["sales@example.com".to_string()]
        );
    }

    #[test]
    fn phone_keeps_parenthesized_area_code() {
        let extractor = ContactExtractor::new();
        assert_eq!(
            extractor.phone("Call us at (305) 555-1234 today"),
            "(305) 555-1234"
        );
        assert_eq!(extractor.phone("+1 305-555-1234"), "+1 305-555-1234");
        assert_eq!(extractor.phone("no numbers here"), "");
    }

    #[test]
    fn company_name_prefers_site_name_metadata() {
        let extractor = ContactExtractor::new();
        let html = r#"
            <head>
              <meta property="og:site_name" content=" Acme Builders ">
              <meta property="og:title" content="Home - Acme">
              <title>Acme | Home</title>
            </head>
            <body><h1>Welcome</h1></body>
        "#;
        assert_eq!(
            extractor.company_name(html, "https://acme.example.com"),
            "Acme Builders"
        );
    }

    #[test]
    fn company_name_falls_back_to_heading_then_host() {
        let extractor = ContactExtractor::new();
        assert_eq!(
            extractor.company_name(
                "<body><h1>Acme Builders</h1></body>",
                "https://www.acme.com"
            ),
            "Acme Builders"
        );
        assert_eq!(
            extractor.company_name("<body></body>", "https://www.acme.com/about"),
            "acme.com"
        );
    }

    #[test]
    fn company_name_is_capped_at_120_chars() {
        let extractor = ContactExtractor::new();
        let long = "x".repeat(300);
        let html = format!("<title>{}</title>", long);
        assert_eq!(extractor.company_name(&html, "https://a.com").len(), 120);
    }

    #[test]
    fn contact_pages_include_fallback_suffixes() {
        let extractor = ContactExtractor::new();
        let pages = extractor.likely_contact_pages("https://acme.com", "<body></body>");
        assert_eq!(
            pages,
            vec![
                "https://acme.com/contact".to_string(),
                "https://acme.com/contact-us".to_string(),
                "https://acme.com/about".to_string(),
            ]
        );
    }

    #[test]
    fn contact_pages_are_unique_and_capped_at_six() {
        let extractor = ContactExtractor::new();
        let html = r#"
            <a href="/contact">Contact</a>
            <a href="/contact">Contact again</a>
            <a href="/about-the-team">Team</a>
            <a href="/our-team">Our team</a>
            <a href="/company/about">About</a>
            <a href="https://other.com/contact-us">External</a>
            <a href="/pricing">Pricing</a>
        "#;
        let pages = extractor.likely_contact_pages("https://acme.com", html);
        assert!(pages.len() <= 6);
        assert_eq!(
            pages.iter().collect::<std::collections::HashSet<_>>().len(),
            pages.len()
        );
        assert!(pages.contains(&"https://acme.com/contact".to_string()));
        assert!(!pages.iter().any(|p| p.contains("pricing")));
    }
}
