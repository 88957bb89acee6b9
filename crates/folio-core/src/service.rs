//! The contact flow: issue a code, confirm it, forward the message.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::address::EmailAddress;
use crate::error::{ContactError, CoreResult};
use crate::form::{ContactForm, ContactSubmission};
use crate::limiter::{AttemptLimiter, RateDecision};
use crate::mailer::Mailer;
use crate::reputation::DomainPolicy;
use crate::template::{self, SiteProfile};
use crate::verification::VerificationStore;

/// Tunables for [`ContactService`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub code_ttl: Duration,
    pub max_attempts: u32,
    pub attempt_window: Duration,
    /// When set, `/api/contact` only forwards mail for confirmed addresses.
    pub require_verified: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            code_ttl: Duration::from_secs(10 * 60),
            max_attempts: 3,
            attempt_window: Duration::from_secs(60 * 60),
            require_verified: true,
        }
    }
}

pub struct ContactService {
    policy: DomainPolicy,
    limiter: AttemptLimiter,
    store: VerificationStore,
    profile: SiteProfile,
    mailer: Arc<dyn Mailer>,
    require_verified: bool,
}

impl ContactService {
    pub fn new(
        settings: ServiceSettings,
        policy: DomainPolicy,
        profile: SiteProfile,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            policy,
            limiter: AttemptLimiter::new(settings.max_attempts, settings.attempt_window),
            store: VerificationStore::new(settings.code_ttl),
            profile,
            mailer,
            require_verified: settings.require_verified,
        }
    }

    /// Validates the address, applies the disposable and rate checks, then
    /// mails a fresh code to the sender.
    pub async fn request_code(
        &self,
        email: &str,
        form: ContactForm,
        now: Instant,
    ) -> CoreResult<EmailAddress> {
        let address = EmailAddress::parse(email)?;

        if self.policy.is_disposable(&address.domain()) {
            tracing::warn!("Blocked disposable address: {address}");
            return Err(ContactError::DisposableEmail);
        }

        let key = address.key();
        if let RateDecision::Limited = self.limiter.check(&key, now) {
            tracing::warn!("Code request rate limited: {address}");
            return Err(ContactError::RateLimited);
        }

        let name = form.name.clone();
        let code = self.store.issue(&key, form, now);
        let mail = template::verification_mail(
            &self.profile,
            address.as_str(),
            &name,
            &code,
            self.store.ttl(),
        );
        self.mailer.send(mail).await?;

        tracing::info!("Verification code sent to {address}");
        Ok(address)
    }

    /// Checks a submitted code and records the address as verified.
    pub fn confirm_code(&self, email: &str, code: &str, now: Instant) -> CoreResult<EmailAddress> {
        let address = EmailAddress::parse(email)?;
        match self.store.confirm(&address.key(), code, now) {
            Ok(_) => {
                tracing::info!("Email verified: {address}");
                Ok(address)
            }
            Err(e) => {
                tracing::warn!("Verification failed for {address}: {e}");
                Err(e)
            }
        }
    }

    /// Forwards a submission to the site owner and acknowledges the sender.
    ///
    /// Returns the submission as delivered, with blank fields filled from
    /// the form captured at verification time.
    pub async fn deliver(
        &self,
        mut submission: ContactSubmission,
        now: Instant,
    ) -> CoreResult<ContactSubmission> {
        let key = submission.email.trim().to_lowercase();
        if let Some(grant) = self.store.peek_grant(&key, now) {
            submission.fill_from(&grant.form);
        }

        submission.require_all()?;
        let address = EmailAddress::parse(&submission.email)?;
        submission.email = address.as_str().to_string();

        if !self.policy.is_trusted(&address.domain()) {
            tracing::warn!("Blocked untrusted email attempt in contact route: {address}");
            return Err(ContactError::UntrustedEmail);
        }

        let grant = if self.require_verified {
            let grant = self.store.take_grant(&address.key(), now).ok_or_else(|| {
                tracing::warn!("Contact submission without verification: {address}");
                ContactError::NotVerified
            })?;
            Some(grant)
        } else {
            None
        };

        let notification = template::owner_notification(&self.profile, &submission);
        if let Err(e) = self.mailer.send(notification).await {
            if let Some(grant) = grant {
                self.store.restore_grant(&address.key(), grant);
            }
            return Err(e);
        }

        let reply = template::auto_reply(&self.profile, &submission);
        if let Err(e) = self.mailer.send(reply).await {
            tracing::warn!("Auto-reply to {address} failed: {e}");
        }

        tracing::info!("Contact message from {address} delivered");
        Ok(submission)
    }

    /// Drops expired codes, grants and attempt counters.
    pub fn sweep(&self, now: Instant) {
        self.limiter.cleanup_expired(now);
        self.store.cleanup_expired(now);
    }
}
