//! One-time code storage and verified-address grants.
//!
//! A pending code lives until it is confirmed, replaced, or older than the
//! TTL. Confirming it converts the entry into a [`VerifiedGrant`] that the
//! contact delivery step consumes exactly once.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::code::{constant_time_eq, generate_code};
use crate::error::{ContactError, CoreResult};
use crate::form::ContactForm;

#[derive(Debug, Clone)]
pub struct PendingVerification {
    pub code: String,
    pub issued_at: Instant,
    pub form: ContactForm,
}

#[derive(Debug, Clone)]
pub struct VerifiedGrant {
    pub form: ContactForm,
    pub verified_at: Instant,
}

pub struct VerificationStore {
    pending: DashMap<String, PendingVerification>,
    verified: DashMap<String, VerifiedGrant>,
    ttl: Duration,
}

impl VerificationStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: DashMap::new(),
            verified: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a fresh code for `key`, replacing any pending one.
    pub fn issue(&self, key: &str, form: ContactForm, now: Instant) -> String {
        let code = generate_code();
        self.pending.insert(
            key.to_string(),
            PendingVerification {
                code: code.clone(),
                issued_at: now,
                form,
            },
        );
        tracing::debug!("Verification code issued: key={key}, pending={}", self.pending.len());
        code
    }

    /// Checks `code` against the pending entry for `key`.
    ///
    /// # Errors
    ///
    /// - [`ContactError::CodeNotFound`] if nothing is pending.
    /// - [`ContactError::CodeExpired`] if the entry outlived the TTL (it is removed).
    /// - [`ContactError::CodeMismatch`] if the code differs (the entry is kept).
    pub fn confirm(&self, key: &str, code: &str, now: Instant) -> CoreResult<ContactForm> {
        let entry = self.pending.get(key).ok_or(ContactError::CodeNotFound)?;

        if now.saturating_duration_since(entry.issued_at) > self.ttl {
            drop(entry);
            self.pending.remove(key);
            tracing::debug!("Verification code expired: key={key}");
            return Err(ContactError::CodeExpired);
        }

        if !constant_time_eq(code.trim().as_bytes(), entry.code.as_bytes()) {
            return Err(ContactError::CodeMismatch);
        }

        drop(entry);
        let (_, pending) = self.pending.remove(key).ok_or(ContactError::CodeNotFound)?;
        self.verified.insert(
            key.to_string(),
            VerifiedGrant {
                form: pending.form.clone(),
                verified_at: now,
            },
        );
        Ok(pending.form)
    }

    /// Returns the live grant for `key` without consuming it.
    pub fn peek_grant(&self, key: &str, now: Instant) -> Option<VerifiedGrant> {
        let grant = self.verified.get(key)?;
        if now.saturating_duration_since(grant.verified_at) > self.ttl {
            return None;
        }
        Some(grant.clone())
    }

    /// Removes and returns the grant for `key` if it has not expired.
    pub fn take_grant(&self, key: &str, now: Instant) -> Option<VerifiedGrant> {
        let (_, grant) = self.verified.remove(key)?;
        if now.saturating_duration_since(grant.verified_at) > self.ttl {
            tracing::debug!("Verified grant expired: key={key}");
            return None;
        }
        Some(grant)
    }

    /// Puts a taken grant back, e.g. after a failed delivery.
    pub fn restore_grant(&self, key: &str, grant: VerifiedGrant) {
        self.verified.insert(key.to_string(), grant);
    }

    pub fn cleanup_expired(&self, now: Instant) {
        let ttl = self.ttl;
        self.pending
            .retain(|_, p| now.saturating_duration_since(p.issued_at) <= ttl);
        self.verified
            .retain(|_, g| now.saturating_duration_since(g.verified_at) <= ttl);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn verified_len(&self) -> usize {
        self.verified.len()
    }
}
