use async_trait::async_trait;

use crate::error::CoreResult;

/// A rendered message ready for the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

/// Outbound mail transport.
///
/// Implementations map their transport failures to
/// [`ContactError::Delivery`](crate::ContactError::Delivery).
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> CoreResult<()>;
}
