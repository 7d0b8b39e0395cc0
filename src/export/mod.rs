pub mod drafts;

use std::io::Write;
use tracing::info;

use crate::models::{Lead, Result};

pub const LEADS_CSV_HEADER: &str = "Company,Email,Website,Phone,Source,EmailVerified,MXDomain";

pub struct LeadExporter;

impl LeadExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn leads_to_csv(&self, leads: &[Lead]) -> String {
        let mut out = String::from(LEADS_CSV_HEADER);
        out.push('\n');
        for lead in leads {
            out.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                csv_escape(&lead.company),
                csv_escape(&lead.email),
                csv_escape(&lead.website),
                csv_escape(&lead.phone),
                lead.source,
                lead.email_verified,
                csv_escape(&lead.mx_domain),
            ));
        }
        out
    }

    pub async fn export_leads(&self, leads: &[Lead], filename: &str) -> Result<()> {
        if let Some(parent) = std::path::Path::new(filename).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(filename)?;
        file.write_all(self.leads_to_csv(leads).as_bytes())?;
        info!("📤 Wrote {} leads to {}", leads.len(), filename);
        Ok(())
    }

    pub async fn export_drafts(&self, out: &[drafts::EmailDraft], filename: &str) -> Result<()> {
        if let Some(parent) = std::path::Path::new(filename).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(filename)?;
        writeln!(file, "To,Company,Website,Phone,From,Subject,Body")?;
        for draft in out {
            writeln!(
                file,
                "{},{},{},{},{},{},{}",
                csv_escape(&draft.to),
                csv_escape(&draft.company),
                csv_escape(&draft.website),
                csv_escape(&draft.phone),
                csv_escape(&draft.from),
                csv_escape(&draft.subject),
                csv_escape(&draft.body),
            )?;
        }
        info!("📤 Wrote {} email drafts to {}", out.len(), filename);
        Ok(())
    }
}

impl Default for LeadExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote a field when it would otherwise break the row.
pub fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmailVerified;
    use crate::search::Engine;

    #[test]
    fn escapes_commas_quotes_and_newlines() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn leads_csv_has_expected_header_and_rows() {
        let exporter = LeadExporter::new();
        let leads = vec![Lead {
            company: "Acme, Inc".to_string(),
            email: "info@acme.com".to_string(),
            website: "http://acme.com".to_string(),
            phone: "(305) 555-1234".to_string(),
            source: Engine::DuckDuckGo,
            email_verified: EmailVerified::SyntaxOnly,
            mx_domain: String::new(),
        }];
        let csv = exporter.leads_to_csv(&leads);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Company,Email,Website,Phone,Source,EmailVerified,MXDomain")
        );
        assert_eq!(
            lines.next(),
            Some("\"Acme, Inc\",info@acme.com,http://acme.com,(305) 555-1234,duckduckgo,SyntaxOnly,")
        );
    }
}
