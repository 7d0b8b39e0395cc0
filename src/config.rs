use serde::{Deserialize, Serialize};

use crate::search::Engine;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub search: SearchConfig,
    pub filters: FilterConfig,
    pub verification: VerificationConfig,
    pub sender: SenderConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// One search per entry, run in order.
    pub queries: Vec<String>,
    /// Engines to query, in precedence order for duplicate resolution.
    pub engines: Vec<Engine>,
    pub max_results_per_query: usize,
    /// Sleep before every outbound request, in seconds.
    pub polite_delay_secs: f64,
    /// When false, results whose company name looks like a flooring
    /// competitor are dropped.
    pub include_flooring_companies: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Host suffixes to accept; empty means accept everything not denied.
    pub allow_domains: Vec<String>,
    /// Host suffixes to reject; checked before the allow list.
    pub deny_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VerificationConfig {
    pub check_mx: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SenderConfig {
    pub email: String,
    pub name: String,
    pub title: String,
    pub phone_display: String,
    pub website_display: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub cache_db: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                queries: vec![
                    "General Contractors Miami Dade".to_string(),
                    "Builders Miami Dade".to_string(),
                    "Architects Miami Dade".to_string(),
                    "Construction Companies Broward".to_string(),
                    "Flooring contractors Miami commercial".to_string(),
                    "Renovation contractors Broward".to_string(),
                ],
                engines: vec![Engine::DuckDuckGo, Engine::Bing, Engine::Google],
                max_results_per_query: 25,
                polite_delay_secs: 0.7,
                include_flooring_companies: true,
            },
            filters: FilterConfig::default(),
            verification: VerificationConfig::default(),
            sender: SenderConfig {
                email: "info@miamimasterflooring.com".to_string(),
                name: "Luis Gonzalez".to_string(),
                title: "Business Development".to_string(),
                phone_display: "(305) 555-7890".to_string(),
                website_display: "https://miamimasterflooring.com".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "out".to_string(),
                cache_db: "data/cache.db".to_string(),
            },
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
