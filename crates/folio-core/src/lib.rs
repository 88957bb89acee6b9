//! Folio core library — transport-agnostic contact form logic.
//!
//! `folio-core` holds everything the portfolio contact endpoints decide:
//! which addresses are acceptable, how often a code may be requested, how
//! one-time codes are issued and checked, and what the outgoing mail says.
//! Sending is delegated to a [`Mailer`] so the HTTP frontend (`folio-web`)
//! picks the transport.
//!
//! # Modules
//!
//! - [`address`] — [`EmailAddress`] parsing and normalisation.
//! - [`reputation`] — disposable/trusted domain lists and [`DomainPolicy`].
//! - [`limiter`] — fixed-window per-address [`AttemptLimiter`].
//! - [`verification`] — pending codes and verified grants ([`VerificationStore`]).
//! - [`template`] — HTML bodies for the verification, notification and auto-reply mails.
//! - [`service`] — [`ContactService`], the request/confirm/deliver flow.
//! - [`error`] — [`ContactError`] and [`CoreResult`].

pub mod address;
pub mod code;
pub mod error;
pub mod form;
pub mod limiter;
pub mod mailer;
pub mod reputation;
pub mod service;
pub mod template;
pub mod verification;

pub use address::EmailAddress;
pub use error::{ContactError, CoreResult};
pub use form::{ContactForm, ContactSubmission};
pub use limiter::{AttemptLimiter, RateDecision};
pub use mailer::{Mailer, OutgoingMail};
pub use reputation::DomainPolicy;
pub use service::{ContactService, ServiceSettings};
pub use template::{SiteLink, SiteProfile};
pub use verification::{VerificationStore, VerifiedGrant};
