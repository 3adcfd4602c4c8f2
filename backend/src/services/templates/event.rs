//! Skeletons and conditional sections of the event invitation email.

use super::render::Sections;
use common::model::record::RecipientRecord;

pub const HTML_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Event Invitation</title>
</head>
<body style="margin: 0; padding: 0; background-color: #f5f5f5; font-family: Arial, Helvetica, sans-serif;">
    <table role="presentation" cellspacing="0" cellpadding="0" border="0" width="100%" style="background-color: #f5f5f5;">
        <tr>
            <td style="padding: 40px 20px;">
                <table role="presentation" cellspacing="0" cellpadding="0" border="0" width="640" style="margin: 0 auto; background-color: #ffffff; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);">
                    {HeroImageSection}
                    <tr>
                        <td style="padding: 40px 40px 30px; text-align: center; border-bottom: 3px solid #2c5282;">
                            <h1 style="margin: 0; font-size: 26px; color: #1a202c; font-weight: bold;">{OrgName}</h1>
                            <p style="margin: 8px 0 0; font-size: 14px; color: #718096;">cordially invites you</p>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px;">
                            <p style="margin: 0 0 20px; font-size: 16px; color: #2d3748; line-height: 1.6;">Dear {Name},</p>
                            <p style="margin: 0 0 30px; font-size: 16px; color: #2d3748; line-height: 1.6;">
                                We are pleased to invite you to attend <strong>{EventTitle}</strong>, hosted by <strong>{OrgName}</strong>.
                            </p>
                            <table role="presentation" cellspacing="0" cellpadding="0" border="0" width="100%" style="background-color: #f7fafc; border-left: 4px solid #2c5282; border-radius: 6px; margin-bottom: 30px;">
                                <tr>
                                    <td style="padding: 24px;">
                                        <h2 style="margin: 0 0 20px; font-size: 22px; color: #1a202c;">{EventTitle}</h2>
                                        <table role="presentation" cellspacing="0" cellpadding="0" border="0" width="100%">
                                            <tr>
                                                <td style="padding: 8px 0;">
                                                    <p style="margin: 0; font-size: 15px; color: #2d3748; line-height: 1.6;">
                                                        <strong>Date:</strong> {EventDate}
                                                    </p>
                                                </td>
                                            </tr>
                                            <tr>
                                                <td style="padding: 8px 0;">
                                                    <p style="margin: 0; font-size: 15px; color: #2d3748; line-height: 1.6;">
                                                        <strong>Time:</strong> {EventTime} {EventTimezone}
                                                    </p>
                                                </td>
                                            </tr>
                                            <tr>
                                                <td style="padding: 8px 0;">
                                                    <p style="margin: 0; font-size: 15px; color: #2d3748; line-height: 1.6;">
                                                        <strong>Location:</strong> {EventLocation}
                                                    </p>
                                                </td>
                                            </tr>
                                        </table>
                                    </td>
                                </tr>
                            </table>
                            <p style="margin: 0 0 20px; font-size: 16px; color: #2d3748; line-height: 1.6;">
                                {EventDescription}
                            </p>
                            {OutcomesSection}
                            {SpeakersSection}
                            <table role="presentation" cellspacing="0" cellpadding="0" border="0" width="100%" style="margin-top: 30px;">
                                <tr>
                                    <td align="center" style="padding: 0 0 20px;">
                                        <a href="{RSVP_URL}" style="display: inline-block; padding: 16px 48px; background-color: #2c5282; color: #ffffff; text-decoration: none; font-size: 16px; font-weight: bold; border-radius: 6px; margin: 0 8px;">
                                            RSVP Now
                                        </a>
                                        <a href="{CalendarICSURL}" style="display: inline-block; padding: 16px 32px; background-color: #ffffff; color: #2c5282; text-decoration: none; font-size: 16px; font-weight: bold; border-radius: 6px; border: 2px solid #2c5282; margin: 0 8px;">
                                            Add to Calendar
                                        </a>
                                    </td>
                                </tr>
                                <tr>
                                    <td align="center" style="padding: 0 0 30px;">
                                        <p style="margin: 0; font-size: 13px; color: #718096; line-height: 1.6;">
                                            RSVP: <a href="{RSVP_URL}" style="color: #2c5282; word-break: break-all;">{RSVP_URL}</a><br>
                                            Calendar: <a href="{CalendarICSURL}" style="color: #2c5282; word-break: break-all;">{CalendarICSURL}</a>
                                        </p>
                                    </td>
                                </tr>
                            </table>
                            <p style="margin: 0 0 8px; font-size: 16px; color: #2d3748; line-height: 1.6;">
                                We look forward to your participation. Should you have any questions, please contact us at
                                <a href="mailto:{SupportEmail}" style="color: #2c5282; text-decoration: none;">{SupportEmail}</a>.
                            </p>
                            <p style="margin: 30px 0 8px; font-size: 16px; color: #2d3748; line-height: 1.6;">Kind regards,</p>
                            <p style="margin: 0; font-size: 16px; color: #2d3748; line-height: 1.6;">
                                <strong>{OrgName} Team</strong>
                            </p>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 30px 40px; background-color: #f7fafc; border-top: 1px solid #e2e8f0; border-radius: 0 0 8px 8px;">
                            <p style="margin: 0 0 12px; font-size: 13px; color: #718096; line-height: 1.6; text-align: center;">
                                {FooterContact}
                            </p>
                            {UnsubscribeSection}
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
Event Invitation

Dear {Name},

We are pleased to invite you to attend {EventTitle}, hosted by {OrgName}.

EVENT DETAILS
Event: {EventTitle}
Date: {EventDate}
Time: {EventTime} {EventTimezone}
Location: {EventLocation}

DESCRIPTION
{EventDescription}

{OutcomesSection}{SpeakersSection}RSVP
Please confirm your attendance: {RSVP_URL}

ADD TO CALENDAR
{CalendarICSURL}

We look forward to your participation. Should you have any questions, please contact us at {SupportEmail}.

Kind regards,
{OrgName} Team

---
{FooterContact}
{UnsubscribeSection}© {Year} {OrgName}. All rights reserved.
";

const LIST_HEADING_STYLE: &str = "margin: 0 0 12px; font-size: 16px; color: #2d3748; line-height: 1.6;";
const LIST_STYLE: &str =
    "margin: 0 0 30px; padding-left: 24px; font-size: 16px; color: #2d3748; line-height: 1.8;";

pub(crate) fn sections(record: &RecipientRecord) -> Sections {
    let mut sections = Sections::default();

    // The hero banner has no plain-text counterpart.
    let hero = record.value("HeroImageURL");
    let hero_html = if hero.is_empty() {
        String::new()
    } else {
        format!(
            r#"<tr><td style="padding: 0;"><img src="{}" alt="Event" style="width: 100%; height: auto; display: block; border-radius: 8px 8px 0 0;" /></td></tr>"#,
            hero
        )
    };
    sections.set("HeroImageSection", hero_html, String::new());

    let outcomes: Vec<&str> = ["Outcome1", "Outcome2"]
        .into_iter()
        .map(|field| record.value(field))
        .filter(|value| !value.is_empty())
        .collect();
    if outcomes.is_empty() {
        sections.set("OutcomesSection", String::new(), String::new());
    } else {
        let items: String = outcomes.iter().map(|o| format!("<li>{}</li>", o)).collect();
        let text: String = outcomes.iter().map(|o| format!("- {}\n", o)).collect();
        sections.set(
            "OutcomesSection",
            list_html("Key Outcomes:", &items),
            format!("KEY OUTCOMES\n{}\n", text),
        );
    }

    let speakers: Vec<(&str, &str)> = [
        ("Speaker1Name", "Speaker1Title"),
        ("Speaker2Name", "Speaker2Title"),
    ]
    .into_iter()
    .map(|(name, title)| (record.value(name), record.value(title)))
    .filter(|(name, _)| !name.is_empty())
    .collect();
    if speakers.is_empty() {
        sections.set("SpeakersSection", String::new(), String::new());
    } else {
        let items: String = speakers
            .iter()
            .map(|(name, title)| match *title {
                "" => format!("<li><strong>{}</strong></li>", name),
                title => format!("<li><strong>{}</strong>, {}</li>", name, title),
            })
            .collect();
        let text: String = speakers
            .iter()
            .map(|(name, title)| match *title {
                "" => format!("- {}\n", name),
                title => format!("- {}, {}\n", name, title),
            })
            .collect();
        sections.set(
            "SpeakersSection",
            list_html("Featured Speakers:", &items),
            format!("FEATURED SPEAKERS\n{}\n", text),
        );
    }

    let contact: Vec<&str> = ["OrgAddress", "SupportEmail"]
        .into_iter()
        .map(|field| record.value(field))
        .filter(|value| !value.is_empty())
        .collect();
    sections.set("FooterContact", contact.join(" • "), contact.join(" | "));

    let unsubscribe = record.value("UnsubscribeURL");
    if unsubscribe.is_empty() {
        sections.set("UnsubscribeSection", String::new(), String::new());
    } else {
        sections.set(
            "UnsubscribeSection",
            format!(
                r#"<p style="margin: 0 0 12px; font-size: 12px; color: #a0aec0; line-height: 1.5; text-align: center;"><a href="{}" style="color: #a0aec0; text-decoration: underline;">Unsubscribe from event invitations</a></p>"#,
                unsubscribe
            ),
            format!("Unsubscribe: {}\n", unsubscribe),
        );
    }

    sections
}

fn list_html(heading: &str, items: &str) -> String {
    format!(
        r#"<p style="{}"><strong>{}</strong></p><ul style="{}">{}</ul>"#,
        LIST_HEADING_STYLE, heading, LIST_STYLE, items
    )
}
