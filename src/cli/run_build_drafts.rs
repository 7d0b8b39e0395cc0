use dialoguer::{theme::ColorfulTheme, MultiSelect};

use crate::export::drafts::{build_drafts, DEFAULT_TEMPLATE};
use crate::export::LeadExporter;
use crate::models::{CliApp, Lead, Result};

impl CliApp {
    pub async fn run_build_drafts(&self) -> Result<()> {
        if self.leads.is_empty() {
            println!("\nNo leads yet. Run a search first.");
            return Ok(());
        }

        let labels: Vec<String> = self
            .leads
            .iter()
            .map(|lead| format!("{} — {}", lead.company, lead.email))
            .collect();
        let defaults = vec![true; labels.len()];

        let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Choose companies (space toggles, enter confirms)")
            .items(&labels)
            .defaults(&defaults)
            .interact()?;

        if chosen.is_empty() {
            println!("Nothing selected.");
            return Ok(());
        }

        let selected: Vec<Lead> = chosen.iter().map(|&i| self.leads[i].clone()).collect();
        let drafts = build_drafts(&selected, &self.config.sender, DEFAULT_TEMPLATE);

        let filename = format!("{}/email_drafts.csv", self.config.output.directory);
        LeadExporter::new().export_drafts(&drafts, &filename).await?;
        println!("✉️  Created {} email drafts in {}", drafts.len(), filename);
        Ok(())
    }
}
