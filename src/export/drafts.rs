use crate::config::SenderConfig;
use crate::models::Lead;

/// Plain-text template with the fixed placeholder set. No control flow, just
/// substitution.
pub const DEFAULT_TEMPLATE: &str = "\
Subject: Premium Flooring Support for Your Projects

Dear {company_or_contact},

We came across your work while researching active projects in South Florida. \
At Miami Master Flooring, we provide fast, reliable flooring installation for \
multifamily, commercial, and renovation projects in Miami-Dade and Broward.

Highlights:
- SPC and LVP installations
- Carpet tile for turns
- Tile and baseboard
- Fast turnaround and clean job sites

If you have upcoming units or projects that need flooring, I would be glad to \
help with pricing and scheduling.

Best regards,
{sender_name}
{sender_title}
Miami Master Flooring
{phone_display}
{website_display}
From: {sender_email}
To: {recipient_email}
Unsubscribe: reply STOP
";

#[derive(Debug, Clone)]
pub struct EmailDraft {
    pub to: String,
    pub company: String,
    pub website: String,
    pub phone: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Fills every placeholder. An empty company falls back to "Team" so the
/// greeting never reads "Dear ,".
pub fn render_template(
    template: &str,
    sender: &SenderConfig,
    company: &str,
    recipient: &str,
) -> String {
    let company_or_contact = if company.is_empty() { "Team" } else { company };
    template
        .replace("{company_or_contact}", company_or_contact)
        .replace("{sender_name}", &sender.name)
        .replace("{sender_title}", &sender.title)
        .replace("{phone_display}", &sender.phone_display)
        .replace("{website_display}", &sender.website_display)
        .replace("{sender_email}", &sender.email)
        .replace("{recipient_email}", recipient)
}

/// Splits a leading `Subject:` line off the rendered text.
pub fn split_subject(rendered: &str) -> (String, String) {
    if rendered.to_lowercase().starts_with("subject:") {
        if let Some(newline) = rendered.find('\n') {
            let subject = rendered["Subject:".len()..newline].trim().to_string();
            let body = rendered[newline + 1..].trim_start().to_string();
            return (subject, body);
        }
    }
    (String::new(), rendered.to_string())
}

pub fn build_drafts(leads: &[Lead], sender: &SenderConfig, template: &str) -> Vec<EmailDraft> {
    leads
        .iter()
        .map(|lead| {
            let rendered = render_template(template, sender, &lead.company, &lead.email);
            let (subject, body) = split_subject(&rendered);
            EmailDraft {
                to: lead.email.clone(),
                company: lead.company.clone(),
                website: lead.website.clone(),
                phone: lead.phone.clone(),
                from: sender.email.clone(),
                subject,
                body,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmailVerified;
    use crate::search::Engine;

    fn sender() -> SenderConfig {
        SenderConfig {
            email: "info@miamimasterflooring.com".to_string(),
            name: "Luis Gonzalez".to_string(),
            title: "Business Development".to_string(),
            phone_display: "(305) 555-7890".to_string(),
            website_display: "https://miamimasterflooring.com".to_string(),
        }
    }

    #[test]
    fn every_placeholder_is_substituted() {
        let rendered = render_template(DEFAULT_TEMPLATE, &sender(), "Acme", "a@acme.com");
        assert!(!rendered.contains('{'));
        assert!(rendered.contains("Dear Acme,"));
        assert!(rendered.contains("To: a@acme.com"));
        assert!(rendered.contains("Luis Gonzalez"));
    }

    #[test]
    fn empty_company_greets_the_team() {
        let rendered = render_template(DEFAULT_TEMPLATE, &sender(), "", "a@acme.com");
        assert!(rendered.contains("Dear Team,"));
    }

    #[test]
    fn subject_line_is_split_from_body() {
        let (subject, body) = split_subject("Subject: Hello there\n\nBody text");
        assert_eq!(subject, "Hello there");
        assert_eq!(body, "Body text");

        let (subject, body) = split_subject("No subject line");
        assert_eq!(subject, "");
        assert_eq!(body, "No subject line");
    }

    #[test]
    fn drafts_carry_lead_fields() {
        let leads = vec![Lead {
            company: "Acme".to_string(),
            email: "a@acme.com".to_string(),
            website: "http://acme.com".to_string(),
            phone: "".to_string(),
            source: Engine::Bing,
            email_verified: EmailVerified::No,
            mx_domain: String::new(),
        }];
        let drafts = build_drafts(&leads, &sender(), DEFAULT_TEMPLATE);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].to, "a@acme.com");
        assert_eq!(drafts[0].subject, "Premium Flooring Support for Your Projects");
        assert!(drafts[0].body.starts_with("Dear Acme,"));
    }
}
