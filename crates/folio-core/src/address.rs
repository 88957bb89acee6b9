//! Email address parsing.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ContactError, CoreResult};

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("address pattern is valid"));

/// A syntactically valid `local@domain.tld` address.
///
/// The address keeps the casing it was submitted with (it is echoed back in
/// mails), while [`EmailAddress::key`] gives the lowercase form used to index
/// per-address state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    raw: String,
    at: usize,
}

impl EmailAddress {
    /// Parses a submitted address, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// [`ContactError::InvalidEmail`] if the address has no `@`, more than
    /// one `@`, whitespace, or a domain without a dot.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let raw = raw.trim();
        if !ADDRESS_RE.is_match(raw) {
            return Err(ContactError::InvalidEmail);
        }
        let at = raw.find('@').ok_or(ContactError::InvalidEmail)?;
        Ok(Self {
            raw: raw.to_string(),
            at,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercase domain part.
    pub fn domain(&self) -> String {
        self.raw[self.at + 1..].to_lowercase()
    }

    /// Lowercase address, used as the key for codes, grants and attempts.
    pub fn key(&self) -> String {
        self.raw.to_lowercase()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_address() {
        let addr = EmailAddress::parse("jane@example.com").unwrap();
        assert_eq!(addr.as_str(), "jane@example.com");
        assert_eq!(addr.domain(), "example.com");
    }

    #[test]
    fn trims_whitespace() {
        let addr = EmailAddress::parse("  jane@example.com\n").unwrap();
        assert_eq!(addr.as_str(), "jane@example.com");
    }

    #[test]
    fn key_and_domain_are_lowercase() {
        let addr = EmailAddress::parse("Jane.Doe@GMail.COM").unwrap();
        assert_eq!(addr.key(), "jane.doe@gmail.com");
        assert_eq!(addr.domain(), "gmail.com");
        assert_eq!(addr.to_string(), "Jane.Doe@GMail.COM");
    }

    #[test]
    fn rejects_malformed() {
        for raw in [
            "",
            "plainaddress",
            "@example.com",
            "jane@",
            "jane@localhost",
            "jane doe@example.com",
            "jane@@example.com",
            "jane@exa@mple.com",
        ] {
            assert!(
                matches!(EmailAddress::parse(raw), Err(ContactError::InvalidEmail)),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_subdomains_and_plus_tags() {
        let addr = EmailAddress::parse("jane+portfolio@mail.cs.uni.edu").unwrap();
        assert_eq!(addr.domain(), "mail.cs.uni.edu");
    }
}
