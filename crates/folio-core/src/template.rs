//! HTML mail bodies for the contact flow.
//!
//! Every value that originates from the form is passed through
//! [`escape_html`] before it is interpolated.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Deserialize;

use crate::form::ContactSubmission;
use crate::mailer::OutgoingMail;

/// Identity of the portfolio owner, shown in outgoing mail.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteProfile {
    #[serde(default = "default_owner_name")]
    pub owner_name: String,
    /// Inbox that receives forwarded contact messages.
    #[serde(default)]
    pub owner_email: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub links: Vec<SiteLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteLink {
    pub label: String,
    pub url: String,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            owner_name: default_owner_name(),
            owner_email: String::new(),
            tagline: String::new(),
            links: Vec::new(),
        }
    }
}

fn default_owner_name() -> String {
    "Portfolio Owner".to_string()
}

pub const VERIFICATION_SUBJECT: &str = "Verify your email - Contact Form";
pub const AUTO_REPLY_SUBJECT: &str = "Thanks for contacting me!";

/// Escapes the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn verification_mail(
    profile: &SiteProfile,
    to: &str,
    name: &str,
    code: &str,
    ttl: Duration,
) -> OutgoingMail {
    let greeting = if name.trim().is_empty() {
        "Hello,".to_string()
    } else {
        format!("Hello {},", escape_html(name.trim()))
    };
    let minutes = (ttl.as_secs() / 60).max(1);

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #1d3557;">Verify Your Email Address</h2>
  <p>{greeting}</p>
  <p>Please use the following code to verify your email and submit your message to {owner}:</p>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 10px; text-align: center; margin: 20px 0;">
    <h1 style="color: #457b9d; font-size: 36px; letter-spacing: 5px; margin: 0;">{code}</h1>
  </div>
  <p style="color: #666;">This code will expire in {minutes} minutes.</p>
  <p style="color: #666; font-size: 12px;">If you didn't request this, please ignore this email.</p>
</div>"#,
        owner = escape_html(&profile.owner_name),
        code = escape_html(code),
    );

    OutgoingMail {
        to: to.to_string(),
        reply_to: None,
        subject: VERIFICATION_SUBJECT.to_string(),
        html,
    }
}

/// Message forwarded to the site owner; replies go straight to the sender.
pub fn owner_notification(profile: &SiteProfile, submission: &ContactSubmission) -> OutgoingMail {
    let name = escape_html(&submission.name);
    let email = escape_html(&submission.email);
    let subject = escape_html(&submission.subject);
    let message = escape_html(&submission.message);
    let first_name = escape_html(submission.first_name());

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px; background-color: #f4f4f4;">
  <div style="max-width: 600px; margin: 0 auto; background-color: white; border-radius: 10px; overflow: hidden;">
    <div style="background: linear-gradient(135deg, #1d3557 0%, #457b9d 100%); padding: 30px; text-align: center;">
      <h1 style="color: white; margin: 0; font-size: 24px;">New Contact Message</h1>
      <p style="color: #a8dadc; margin: 10px 0 0 0; font-size: 14px;">Email verified &amp; authenticated</p>
    </div>
    <div style="padding: 30px; background-color: #f8f9fa; border-left: 5px solid #457b9d;">
      <h2 style="color: #1d3557; margin: 0 0 15px 0; font-size: 20px;">Sender Information</h2>
      <table style="width: 100%; border-collapse: collapse;">
        <tr><td style="padding: 8px 0; color: #666; font-weight: 600; width: 80px;">Name:</td><td style="padding: 8px 0; color: #1d3557; font-weight: bold;">{name}</td></tr>
        <tr><td style="padding: 8px 0; color: #666; font-weight: 600;">Email:</td><td style="padding: 8px 0;"><a href="mailto:{email}" style="color: #457b9d; text-decoration: none; font-weight: bold;">{email}</a></td></tr>
        <tr><td style="padding: 8px 0; color: #666; font-weight: 600;">Subject:</td><td style="padding: 8px 0; color: #1d3557;">{subject}</td></tr>
      </table>
    </div>
    <div style="padding: 30px;">
      <h3 style="color: #1d3557; margin: 0 0 15px 0; font-size: 18px;">Message</h3>
      <div style="background: #f8f9fa; padding: 20px; border-radius: 8px; border-left: 4px solid #457b9d;">
        <p style="margin: 0; line-height: 1.8; color: #333; white-space: pre-wrap;">{message}</p>
      </div>
    </div>
    <div style="padding: 0 30px 30px 30px; text-align: center;">
      <a href="mailto:{email}" style="display: inline-block; background: #457b9d; color: white; padding: 15px 40px; text-decoration: none; border-radius: 50px; font-weight: bold; font-size: 16px;">Reply to {first_name}</a>
    </div>
    <div style="background: #f8f9fa; padding: 20px; text-align: center; border-top: 1px solid #ddd;">
      <p style="margin: 0; color: #888; font-size: 12px;">This email has been verified and sent from your portfolio contact form<br>Click "Reply" or use the button above to respond directly to {email}</p>
    </div>
  </div>
</div>"#
    );

    OutgoingMail {
        to: profile.owner_email.clone(),
        reply_to: Some(submission.email.clone()),
        subject: format!("New Message from {} - {}", submission.name, submission.subject),
        html,
    }
}

/// Acknowledgement sent back to the person who filled in the form.
pub fn auto_reply(profile: &SiteProfile, submission: &ContactSubmission) -> OutgoingMail {
    let mut footer = String::new();
    if !profile.tagline.is_empty() {
        let _ = write!(
            footer,
            r#"<p style="color: #888; font-size: 12px;">{}</p>"#,
            escape_html(&profile.tagline)
        );
    }
    if !profile.links.is_empty() {
        let links: Vec<String> = profile
            .links
            .iter()
            .map(|l| {
                format!(
                    r#"<a href="{}" style="color: #457b9d; text-decoration: none;">{}</a>"#,
                    escape_html(&l.url),
                    escape_html(&l.label)
                )
            })
            .collect();
        let _ = write!(
            footer,
            r#"<p style="color: #888; font-size: 12px;">{}</p>"#,
            links.join(" | ")
        );
    }

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px; background-color: #f4f4f4;">
  <div style="max-width: 600px; margin: 0 auto; background-color: white; padding: 30px; border-radius: 10px;">
    <h2 style="color: #1d3557;">Hi {name}!</h2>
    <p style="line-height: 1.6; color: #555;">Thank you for reaching out to me. I've received your message and will get back to you as soon as possible.</p>
    <div style="margin: 20px 0; padding: 20px; background-color: #f8f9fa; border-left: 4px solid #457b9d; border-radius: 5px;">
      <p style="margin: 0; color: #333;"><strong>Your message:</strong></p>
      <p style="margin: 10px 0 0 0; line-height: 1.6; color: #555;">{message}</p>
    </div>
    <p style="line-height: 1.6; color: #555;">Best regards,<br><strong style="color: #1d3557;">{owner}</strong></p>
    <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd; text-align: center;">{footer}</div>
  </div>
</div>"#,
        name = escape_html(&submission.name),
        message = escape_html(&submission.message),
        owner = escape_html(&profile.owner_name),
    );

    OutgoingMail {
        to: submission.email.clone(),
        reply_to: None,
        subject: AUTO_REPLY_SUBJECT.to_string(),
        html,
    }
}
