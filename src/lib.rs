pub mod cache;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod export;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod search;
pub mod verifier;

/// Browser identity sent with every outbound HTTP request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
