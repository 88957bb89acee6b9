//! Outbound mail transports.
//!
//! Uses an SMTP relay (lettre) when credentials are configured, otherwise a
//! log-only sender so the service can run locally without a mail account.

use std::sync::Arc;

use async_trait::async_trait;
use folio_core::{ContactError, CoreResult, Mailer, OutgoingMail};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::ServerConfig;

/// Builds the mailer described by `config`.
pub fn build_mailer(config: &ServerConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    let smtp = &config.smtp;

    if !smtp.has_credentials() && smtp.url.is_none() {
        return Ok(Arc::new(LogMailer));
    }

    let transport = match smtp.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?.build(),
        None => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
            .port(smtp.port)
            .credentials(Credentials::new(smtp.username.clone(), smtp.password.clone()))
            .build(),
    };

    let from = Mailbox::new(
        Some(config.site.owner_name.clone()),
        smtp.from_address().parse()?,
    );

    tracing::info!("SMTP relay configured (host: {}, from: {})", smtp.host, from);
    Ok(Arc::new(SmtpMailer { transport, from }))
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    fn build_message(&self, mail: OutgoingMail) -> CoreResult<Message> {
        // The form check is looser than RFC 5322; lettre has the final say.
        let to: Mailbox = mail.to.parse().map_err(|e| {
            tracing::warn!("Recipient {:?} rejected by mail builder: {e}", mail.to);
            delivery(e)
        })?;
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject);

        if let Some(reply_to) = mail.reply_to {
            builder = builder.reply_to(reply_to.parse().map_err(delivery)?);
        }

        builder
            .header(ContentType::TEXT_HTML)
            .body(mail.html)
            .map_err(delivery)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> CoreResult<()> {
        let message = self.build_message(mail)?;
        self.transport.send(message).await.map_err(delivery)?;
        Ok(())
    }
}

/// Development sender that only logs what would have been sent.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> CoreResult<()> {
        tracing::info!(
            "Mail not sent (no SMTP relay): to={}, subject={:?}, {} bytes",
            mail.to,
            mail.subject,
            mail.html.len()
        );
        tracing::debug!("Mail body:\n{}", mail.html);
        Ok(())
    }
}

fn delivery<E: std::fmt::Display>(e: E) -> ContactError {
    ContactError::Delivery(e.to_string())
}
