//! Error types for `folio-core`.
//!
//! Every variant's `Display` text is safe to show to the person filling in
//! the contact form. [`ContactError::status_hint`] tells the HTTP layer which
//! status code the failure maps to.

/// Unified error type for the contact flow.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    /// One of name, email, subject or message is empty.
    #[error("All fields are required")]
    MissingFields,

    /// The address does not look like `local@domain.tld`.
    #[error("Please enter a valid email address.")]
    InvalidEmail,

    /// The address belongs to a throwaway mail service.
    #[error("Please use a valid email address. Temporary/disposable emails are not allowed.")]
    DisposableEmail,

    /// The domain is not on the trusted list and fails the corporate heuristics.
    #[error(
        "Please use a recognized email provider (Gmail, Yahoo, Outlook, ProtonMail, iCloud, etc.) or your company/educational email."
    )]
    UntrustedEmail,

    /// Too many code requests for one address inside the attempt window.
    #[error("Too many attempts. Please try again later.")]
    RateLimited,

    /// No pending code exists for the address.
    #[error("Verification code expired or invalid")]
    CodeNotFound,

    /// The pending code outlived its TTL.
    #[error("Verification code expired")]
    CodeExpired,

    /// The submitted code does not match the pending one.
    #[error("Invalid verification code")]
    CodeMismatch,

    /// A contact submission arrived without a confirmed address.
    #[error("Please verify your email address first.")]
    NotVerified,

    /// The mail relay rejected or failed to accept a message.
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

impl ContactError {
    /// HTTP status code this error should be reported with.
    pub fn status_hint(&self) -> u16 {
        match self {
            ContactError::MissingFields
            | ContactError::InvalidEmail
            | ContactError::DisposableEmail
            | ContactError::CodeNotFound
            | ContactError::CodeExpired
            | ContactError::CodeMismatch => 400,
            ContactError::UntrustedEmail | ContactError::NotVerified => 403,
            ContactError::RateLimited => 429,
            ContactError::Delivery(_) => 500,
        }
    }

    /// Returns `true` for failures whose detail must stay server-side.
    pub fn is_internal(&self) -> bool {
        matches!(self, ContactError::Delivery(_))
    }
}

/// Convenience alias used throughout `folio-core`.
pub type CoreResult<T> = Result<T, ContactError>;
