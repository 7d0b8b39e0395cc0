use std::time::Duration;
use tracing::info;

use crate::models::{CliApp, Result};
use crate::pipeline::RunSettings;

impl CliApp {
    pub async fn run_find_leads(&mut self) -> Result<()> {
        let search = &self.config.search;
        let settings = RunSettings {
            queries: search.queries.clone(),
            max_results: search.max_results_per_query,
            polite_delay: Duration::from_secs_f64(search.polite_delay_secs),
            verify_mx: self.config.verification.check_mx,
            include_competitors: search.include_flooring_companies,
        };

        info!(
            "Starting lead search: {} queries, {} results each, MX check {}",
            settings.queries.len(),
            settings.max_results,
            if settings.verify_mx { "on" } else { "off" }
        );

        let new_leads = self.pipeline.run(&settings, &self.leads).await;
        if new_leads.is_empty() {
            println!("\n⚠️  No new leads found. Try adjusting the queries.");
        } else {
            println!(
                "\n✅ Added {} new leads. Total leads: {}",
                new_leads.len(),
                self.leads.len() + new_leads.len()
            );
        }
        self.leads.extend(new_leads);

        Ok(())
    }
}
