pub mod cli;
pub mod run;
mod run_build_drafts;
mod run_export_leads;
mod run_find_leads;
mod show_cache_stats;

pub use cli::MenuAction;
