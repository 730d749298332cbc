// --- Environment helpers ---

fn mailgun_api_key() -> Result<String, String> {
    std::env::var("MAILGUN_API_KEY").map_err(|_| "MAILGUN_API_KEY is not configured".to_string())
}

fn mailgun_domain() -> Result<String, String> {
    std::env::var("MAILGUN_DOMAIN").map_err(|_| "MAILGUN_DOMAIN is not configured".to_string())
}

fn mailgun_from() -> Result<String, String> {
    match std::env::var("MAILGUN_FROM") {
        Ok(v) => Ok(v),
        Err(_) => Ok(format!(
            "{} <noreply@{}>",
            crate::config::barangay().name,
            mailgun_domain()?
        )),
    }
}

pub fn app_base_url() -> String {
    std::env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

// --- Core email sending ---

#[tracing::instrument(skip(html_body))]
pub async fn send_email(to: &str, subject: &str, html_body: &str) -> Result<(), String> {
    let domain = mailgun_domain()?;
    let url = format!("https://api.mailgun.net/v3/{}/messages", domain);

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .basic_auth("api", Some(mailgun_api_key()?))
        .form(&[
            ("from", mailgun_from()?),
            ("to", to.to_string()),
            ("subject", subject.to_string()),
            ("html", html_body.to_string()),
        ])
        .send()
        .await
        .map_err(|e| format!("Mailgun request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Mailgun API error ({}): {}", status, body));
    }

    tracing::info!(to = to, subject = subject, "Email sent");
    Ok(())
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
}

// --- Case notification messages ---

pub fn status_update_email(
    recipient_name: &str,
    blotter_id: &str,
    status: &str,
    remarks: Option<&str>,
) -> EmailMessage {
    EmailMessage {
        subject: format!("Update on Your Case: {}", blotter_id),
        html: templates::status_update_html(
            recipient_name,
            blotter_id,
            status,
            remarks.unwrap_or(""),
            &crate::config::barangay().display_name(),
        ),
    }
}

pub fn hearing_notice_email(
    recipient_name: &str,
    blotter_id: &str,
    hearing_type: &str,
    when: &str,
    remarks: Option<&str>,
) -> EmailMessage {
    EmailMessage {
        subject: format!("Notice of {} for Case: {}", hearing_type, blotter_id),
        html: templates::hearing_notice_html(
            recipient_name,
            blotter_id,
            hearing_type,
            when,
            remarks,
            &crate::config::barangay().display_name(),
        ),
    }
}

pub fn settlement_email(
    recipient_name: &str,
    blotter_id: &str,
    settlement_date: &str,
    agreement: &str,
) -> EmailMessage {
    EmailMessage {
        subject: format!("Your Case Has Been Settled: {}", blotter_id),
        html: templates::settlement_html(
            recipient_name,
            blotter_id,
            settlement_date,
            agreement,
            &crate::config::barangay().display_name(),
        ),
    }
}

pub fn secretary_review_email(
    secretary_name: &str,
    blotter_id: &str,
    incident_type: &str,
    complainant_name: &str,
    flagged_by: &str,
) -> EmailMessage {
    let link = format!("{}/api/blotters/{}", app_base_url(), blotter_id);
    EmailMessage {
        subject: format!("ACTION REQUIRED: Blotter Case {} for Review", blotter_id),
        html: templates::secretary_review_html(
            secretary_name,
            blotter_id,
            incident_type,
            complainant_name,
            flagged_by,
            &link,
        ),
    }
}

pub fn report_update_email(recipient_name: &str, status: &str, action_taken: &str) -> EmailMessage {
    EmailMessage {
        subject: "Update on Your General Report".to_string(),
        html: templates::report_update_html(
            recipient_name,
            status,
            action_taken,
            &crate::config::barangay().display_name(),
        ),
    }
}


// --- Email templates ---

mod templates {
    pub fn escape(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    fn wrap(title: &str, body: &str, footer: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: Arial, sans-serif; background: #f4f6f8; color: #1f2933; padding: 20px;">
  <div style="max-width: 600px; margin: 0 auto; background: #ffffff; border-top: 4px solid #1e40af; padding: 30px;">
    <h2 style="color: #1e40af;">{title}</h2>
    {body}
    <p style="color: #6b7280; font-size: 12px;">{footer}</p>
  </div>
</body>
</html>"#,
            title = escape(title),
            body = body,
            footer = escape(footer)
        )
    }

    pub fn status_update_html(
        name: &str,
        blotter_id: &str,
        status: &str,
        remarks: &str,
        barangay: &str,
    ) -> String {
        let remarks_block = if remarks.trim().is_empty() {
            String::new()
        } else {
            format!("<p><strong>Remarks:</strong> {}</p>", escape(remarks))
        };
        wrap(
            "Case Status Update",
            &format!(
                "<p>Dear {name},</p>\n    <p>The status of your case <strong>{id}</strong> is now <strong>{status}</strong>.</p>\n    {remarks_block}",
                name = escape(name),
                id = escape(blotter_id),
                status = escape(status),
                remarks_block = remarks_block
            ),
            barangay,
        )
    }

    pub fn hearing_notice_html(
        name: &str,
        blotter_id: &str,
        hearing_type: &str,
        when: &str,
        remarks: Option<&str>,
        barangay: &str,
    ) -> String {
        let remarks = remarks
            .map(|r| format!("\n    <p><strong>Remarks:</strong> {}</p>", escape(r)))
            .unwrap_or_default();
        wrap(
            &format!("Notice of {}", hearing_type),
            &format!(
                "<p>Dear {name},</p>\n    <p>A <strong>{kind}</strong> has been scheduled for your case <strong>{id}</strong> on <strong>{when}</strong>.</p>{remarks}\n    <p>Please appear at the barangay hall on time and bring any supporting documents.</p>",
                name = escape(name),
                kind = escape(hearing_type),
                id = escape(blotter_id),
                when = escape(when)
            ),
            barangay,
        )
    }

    pub fn settlement_html(
        name: &str,
        blotter_id: &str,
        settlement_date: &str,
        agreement: &str,
        barangay: &str,
    ) -> String {
        wrap(
            "Amicable Settlement Reached",
            &format!(
                "<p>Dear {name},</p>\n    <p>Your case <strong>{id}</strong> was amicably settled on <strong>{date}</strong> and is now certified closed.</p>\n    <p><strong>Agreement:</strong> {agreement}</p>",
                name = escape(name),
                id = escape(blotter_id),
                date = escape(settlement_date),
                agreement = escape(agreement)
            ),
            barangay,
        )
    }

    pub fn secretary_review_html(
        secretary_name: &str,
        blotter_id: &str,
        incident_type: &str,
        complainant_name: &str,
        flagged_by: &str,
        link: &str,
    ) -> String {
        wrap(
            "Blotter Case for Review",
            &format!(
                "<p>Dear {sec},</p>\n    <p>Blotter case <strong>{id}</strong> ({kind}) filed by {complainant} needs your review.</p>\n    <p>Flagged by {by}.</p>\n    <p><a href=\"{link}\" style=\"color: #1e40af;\">Open case {id}</a></p>",
                sec = escape(secretary_name),
                id = escape(blotter_id),
                kind = escape(incident_type),
                complainant = escape(complainant_name),
                by = escape(flagged_by),
                link = escape(link)
            ),
            "Barangay Case Management",
        )
    }

    pub fn report_update_html(name: &str, status: &str, action_taken: &str, barangay: &str) -> String {
        wrap(
            "General Report Update",
            &format!(
                "<p>Dear {name},</p>\n    <p>The status of your general report is now <strong>{status}</strong>.</p>\n    <p><strong>Action taken:</strong> {action}</p>",
                name = escape(name),
                status = escape(status),
                action = escape(action_taken)
            ),
            barangay,
        )
    }
}
