use crate::export::LeadExporter;
use crate::models::{CliApp, Result};

impl CliApp {
    pub async fn run_export_leads(&self) -> Result<()> {
        if self.leads.is_empty() {
            println!("\nNo leads to export yet.");
            return Ok(());
        }

        let filename = format!("{}/leads.csv", self.config.output.directory);
        LeadExporter::new().export_leads(&self.leads, &filename).await?;
        println!("📤 Exported {} leads to {}", self.leads.len(), filename);
        Ok(())
    }
}
