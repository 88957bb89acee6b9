use folio_core::ContactForm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl VerifyEmailRequest {
    /// The submitted code, if one was actually entered.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    pub fn form(&self) -> ContactForm {
        ContactForm {
            name: self.name.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum VerifyEmailResponse {
    CodeSent {
        message: String,
        #[serde(rename = "requiresVerification")]
        requires_verification: bool,
    },
    Verified {
        verified: bool,
        message: String,
    },
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
