use dialoguer::{theme::ColorfulTheme, Select};
use tracing::error;

use crate::cli::MenuAction;
use crate::models::{CliApp, Result};

impl CliApp {
    pub async fn run(&mut self) -> Result<()> {
        println!("\n🚀 Welcome to Lead Finder!");
        println!("═══════════════════════════════════════");

        loop {
            let actions = vec![
                MenuAction::FindLeads,
                MenuAction::ShowLeads,
                MenuAction::ExportLeadsCsv,
                MenuAction::BuildEmailDrafts,
                MenuAction::ShowCacheStats,
                MenuAction::ClearLeads,
                MenuAction::Exit,
            ];

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("\nSelect an action")
                .default(0)
                .items(&actions)
                .interact()?;

            match &actions[selection] {
                MenuAction::FindLeads => {
                    if let Err(e) = self.run_find_leads().await {
                        error!("Lead search failed: {}", e);
                    }
                }
                MenuAction::ShowLeads => self.show_leads(),
                MenuAction::ExportLeadsCsv => {
                    if let Err(e) = self.run_export_leads().await {
                        error!("Export failed: {}", e);
                    }
                }
                MenuAction::BuildEmailDrafts => {
                    if let Err(e) = self.run_build_drafts().await {
                        error!("Draft generation failed: {}", e);
                    }
                }
                MenuAction::ShowCacheStats => {
                    self.show_cache_stats().await;
                }
                MenuAction::ClearLeads => {
                    self.leads.clear();
                    println!("🗑️  Leads cleared.");
                }
                MenuAction::Exit => {
                    println!("👋 Goodbye!");
                    return Ok(());
                }
            }
        }
    }

    fn show_leads(&self) {
        if self.leads.is_empty() {
            println!("\nNo leads collected yet. Run a search first.");
            return;
        }
        println!("\n📋 {} leads collected", self.leads.len());
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");
        for lead in &self.leads {
            println!(
                "  {} <{}> — {} [{} / verified: {}]",
                lead.company, lead.email, lead.website, lead.source, lead.email_verified
            );
        }
    }
}
