//! Skeletons and conditional sections of the "Thank You for Attending"
//! certificate email.

use super::render::Sections;
use common::model::record::RecipientRecord;
use common::model::template::CertificateKind;

pub const HTML_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Thank You for Attending</title>
</head>
<body style="margin: 0; padding: 0; background-color: #f5f5f5; font-family: Arial, Helvetica, sans-serif;">
    <table role="presentation" cellspacing="0" cellpadding="0" border="0" width="100%" style="background-color: #f5f5f5;">
        <tr>
            <td style="padding: 40px 20px;">
                <table role="presentation" cellspacing="0" cellpadding="0" border="0" width="640" style="margin: 0 auto; background-color: #ffffff; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);">
                    <tr>
                        <td style="padding: 40px 40px 30px; text-align: center; border-bottom: 3px solid #2c5282;">
                            <h1 style="margin: 0; font-size: 26px; color: #1a202c; font-weight: bold;">{OrgName}</h1>
                            <p style="margin: 8px 0 0; font-size: 14px; color: #718096;">Thank You for Attending</p>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px;">
                            <p style="margin: 0 0 20px; font-size: 16px; color: #2d3748; line-height: 1.6;">Dear {Name},</p>
                            <p style="margin: 0 0 20px; font-size: 16px; color: #2d3748; line-height: 1.6;">
                                {ThankYouMessage}
                            </p>
                            <p style="margin: 0 0 30px; font-size: 16px; color: #2d3748; line-height: 1.6;">
                                {CertificateLine}
                            </p>
                            {EventDetailsSection}
                            {ResourcesSection}
                            {FeedbackSection}
                            <p style="margin: 0 0 8px; font-size: 16px; color: #2d3748; line-height: 1.6;">
                                If you have any questions or would like to stay in touch, please contact us at
                                <a href="mailto:{SupportEmail}" style="color: #2c5282; text-decoration: none;">{SupportEmail}</a>.
                            </p>
                            <p style="margin: 30px 0 8px; font-size: 16px; color: #2d3748; line-height: 1.6;">Warm regards,</p>
                            <p style="margin: 0; font-size: 16px; color: #2d3748; line-height: 1.6;">
                                <strong>{TeamOrSignerName}</strong><br>
                                {Title}<br>
                                {OrgName}
                            </p>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 30px 40px; background-color: #f7fafc; border-top: 1px solid #e2e8f0; border-radius: 0 0 8px 8px;">
                            <p style="margin: 0 0 12px; font-size: 13px; color: #718096; line-height: 1.6; text-align: center;">
                                {FooterContact}
                            </p>
                            <p style="margin: 0 0 12px; font-size: 12px; color: #a0aec0; line-height: 1.5; text-align: center;">
                                This message and certificate are intended for {Name}. Please do not share without consent.
                            </p>
                            <p style="margin: 0; font-size: 12px; color: #a0aec0; text-align: center;">
                                &copy; {Year} {OrgName}. All rights reserved.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>
"##;

pub const TEXT_TEMPLATE: &str = "{OrgName}
Thank You for Attending

Dear {Name},

{ThankYouMessage}

{CertificateLine}

{EventDetailsSection}{ResourcesSection}{FeedbackSection}
Warm regards,
{TeamOrSignerName}
{Title}
{OrgName}

---
{FooterContact}
© {Year} {OrgName}. All rights reserved.
";

const SHARE_LINE: &str = "Feel free to download, print, or share it as you wish.";

/// Builds every conditional block once, in both renderings, from the same
/// presence decisions.
pub(crate) fn sections(
    record: &RecipientRecord,
    kind: CertificateKind,
    attachment_included: bool,
) -> Sections {
    let mut sections = Sections::default();

    let event_name = record.value("EventName");
    let event_date = record.value("EventDate");
    let event_location = record.value("EventLocation");
    let org_name = match record.value("OrgName") {
        "" => "our organization",
        name => name,
    };

    let (thanks_html, thanks_text) = match (event_name, event_date) {
        ("", _) => {
            let line = "Thank you for attending our recent gathering. We truly appreciated having you with us.";
            (line.to_string(), line.to_string())
        }
        (name, "") => (
            format!(
                "Thank you for attending <strong>{}</strong>. We truly appreciated having you with us.",
                name
            ),
            format!(
                "Thank you for attending {}. We truly appreciated having you with us.",
                name
            ),
        ),
        (name, date) => (
            format!(
                "Thank you for attending <strong>{}</strong> on <strong>{}</strong>. \
                 Your presence helped make the experience memorable for our community at {}.",
                name, date, org_name
            ),
            format!(
                "Thank you for attending {} on {}. \
                 Your presence helped make the experience memorable for our community at {}.",
                name, date, org_name
            ),
        ),
    };
    sections.set("ThankYouMessage", thanks_html, thanks_text);

    let (cert_html, cert_text) = certificate_line(record, kind, attachment_included);
    sections.set("CertificateLine", cert_html, cert_text);

    // Event highlights card.
    let details: Vec<(&str, &str)> = [
        ("Event", event_name),
        ("Date", event_date),
        ("Location", event_location),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .collect();
    if details.is_empty() {
        sections.set("EventDetailsSection", String::new(), String::new());
    } else {
        let last = details.len() - 1;
        let lines: String = details
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                let margin = if i == last { "0" } else { "0 0 8px" };
                format!(
                    r#"<p style="margin: {}; font-size: 14px; color: #4a5568; line-height: 1.6;"><strong>{}:</strong> {}</p>"#,
                    margin, label, value
                )
            })
            .collect();
        let html = format!(
            r#"<table role="presentation" cellspacing="0" cellpadding="0" border="0" width="100%" style="background-color: #f7fafc; border-radius: 6px; margin-bottom: 30px;"><tr><td style="padding: 24px;"><p style="margin: 0 0 12px; font-size: 14px; color: #2d3748; font-weight: bold;">Event Highlights</p>{}</td></tr></table>"#,
            lines
        );
        let text_lines: Vec<String> = details
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect();
        let text = format!("EVENT DETAILS\n{}\n\n", text_lines.join("\n"));
        sections.set("EventDetailsSection", html, text);
    }

    let resources_url = record.value("ResourcesURL");
    if resources_url.is_empty() {
        sections.set("ResourcesSection", String::new(), String::new());
    } else {
        let label = match record.value("ResourcesDescription") {
            "" => "Access post-event resources",
            desc => desc,
        };
        let html = format!(
            r#"<table role="presentation" cellspacing="0" cellpadding="0" border="0" width="100%" style="background-color: #edf2f7; border-radius: 6px; margin-bottom: 30px;"><tr><td style="padding: 24px; text-align: center;"><p style="margin: 0 0 8px; font-size: 16px; color: #2d3748;">📚 <strong>Keep exploring</strong></p><a href="{}" style="display: inline-block; margin-top: 12px; padding: 12px 32px; background-color: #2c5282; color: #ffffff; text-decoration: none; font-size: 15px; border-radius: 6px;">{}</a></td></tr></table>"#,
            resources_url, label
        );
        let text = format!("RESOURCES\n{}: {}\n\n", label, resources_url);
        sections.set("ResourcesSection", html, text);
    }

    let feedback_url = record.value("FeedbackURL");
    if feedback_url.is_empty() {
        sections.set("FeedbackSection", String::new(), String::new());
    } else {
        let html = format!(
            r#"<table role="presentation" cellspacing="0" cellpadding="0" border="0" width="100%" style="background-color: #fdf2f8; border-radius: 6px; margin-bottom: 30px;"><tr><td style="padding: 24px; text-align: center;"><p style="margin: 0 0 8px; font-size: 16px; color: #2d3748;">💬 <strong>Share your feedback</strong></p><a href="{}" style="display: inline-block; margin-top: 12px; padding: 12px 32px; background-color: #d53f8c; color: #ffffff; text-decoration: none; font-size: 15px; border-radius: 6px;">Complete the feedback form</a></td></tr></table>"#,
            feedback_url
        );
        let text = format!("FEEDBACK\nShare your thoughts: {}\n\n", feedback_url);
        sections.set("FeedbackSection", html, text);
    }

    let contact: Vec<&str> = ["OrgAddress", "SupportEmail", "OrgPhone"]
        .into_iter()
        .map(|field| record.value(field))
        .filter(|value| !value.is_empty())
        .collect();
    if contact.is_empty() {
        sections.set(
            "FooterContact",
            "Stay connected with us".to_string(),
            "Stay connected with us".to_string(),
        );
    } else {
        sections.set("FooterContact", contact.join(" • "), contact.join(" | "));
    }

    sections
}

fn certificate_line(
    record: &RecipientRecord,
    kind: CertificateKind,
    attachment_included: bool,
) -> (String, String) {
    match kind {
        CertificateKind::Attached => {
            let base = if attachment_included {
                format!(
                    "Your certificate of appreciation is attached to this email as a PNG image. {}",
                    SHARE_LINE
                )
            } else {
                "Your certificate of appreciation will be sent to you separately.".to_string()
            };
            match record.value("CertificateID") {
                "" => (base.clone(), base),
                id => (
                    format!("{} Certificate ID: <strong>{}</strong>", base, id),
                    format!("{} Certificate ID: {}", base, id),
                ),
            }
        }
        CertificateKind::Hosted => match record.value("CertificateURL") {
            "" => {
                let line = "Your certificate of appreciation will be shared with you shortly.";
                (line.to_string(), line.to_string())
            }
            url => (
                format!(
                    r#"Your certificate of appreciation is available online: <a href="{}" style="color: #2c5282;">View your certificate</a>. {}"#,
                    url, SHARE_LINE
                ),
                format!(
                    "Your certificate of appreciation is available online: {}\n{}",
                    url, SHARE_LINE
                ),
            ),
        },
    }
}
