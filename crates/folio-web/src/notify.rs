use folio_core::ContactSubmission;

const PREVIEW_CHARS: usize = 200;

/// Posts a short notice to a Discord webhook when a message is delivered.
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    pub async fn notify_delivery(
        &self,
        submission_id: &str,
        submission: &ContactSubmission,
    ) -> Result<(), anyhow::Error> {
        let body = serde_json::json!({ "content": render_notice(submission_id, submission) });

        let response = self.client.post(&self.webhook_url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Discord webhook failed: {}",
                response.status()
            ));
        }

        Ok(())
    }
}

fn render_notice(submission_id: &str, submission: &ContactSubmission) -> String {
    let mut preview: String = submission.message.chars().take(PREVIEW_CHARS).collect();
    if submission.message.chars().count() > PREVIEW_CHARS {
        preview.push('…');
    }
    format!(
        "New contact message from **{}** <{}>\n**{}**\n{}\n`{}`",
        submission.name, submission.email, submission.subject, preview, submission_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(message: &str) -> ContactSubmission {
        ContactSubmission {
            name: "Jane".to_string(),
            email: "jane@gmail.com".to_string(),
            subject: "Hi".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn notice_contains_sender_and_id() {
        let notice = render_notice("abc-123", &submission("Short note"));
        assert!(notice.contains("**Jane** <jane@gmail.com>"));
        assert!(notice.contains("**Hi**"));
        assert!(notice.contains("Short note"));
        assert!(notice.ends_with("`abc-123`"));
    }

    #[test]
    fn long_messages_are_truncated() {
        let long = "x".repeat(500);
        let notice = render_notice("id", &submission(&long));
        assert!(notice.contains(&format!("{}…", "x".repeat(PREVIEW_CHARS))));
        assert!(!notice.contains(&"x".repeat(PREVIEW_CHARS + 1)));
    }
}
