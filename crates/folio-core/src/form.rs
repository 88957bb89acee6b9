//! Contact form payloads.

use serde::{Deserialize, Serialize};

use crate::error::{ContactError, CoreResult};

/// Form fields captured alongside a verification code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A complete submission ready to be forwarded to the site owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactSubmission {
    /// Fills blank fields from a form captured at verification time.
    pub fn fill_from(&mut self, form: &ContactForm) {
        if is_blank(&self.name) {
            self.name = form.name.clone();
        }
        if is_blank(&self.subject) {
            self.subject = form.subject.clone();
        }
        if is_blank(&self.message) {
            self.message = form.message.clone();
        }
    }

    /// # Errors
    ///
    /// [`ContactError::MissingFields`] if any field is blank.
    pub fn require_all(&self) -> CoreResult<()> {
        let fields = [&self.name, &self.email, &self.subject, &self.message];
        if fields.iter().any(|f| is_blank(f)) {
            return Err(ContactError::MissingFields);
        }
        Ok(())
    }

    /// First word of the sender's name, used in the reply button.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
