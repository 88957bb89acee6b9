//! Domain reputation checks.
//!
//! Two independent gates guard the contact flow:
//!
//! - [`is_disposable`] runs before a verification code is issued and blocks
//!   throwaway inbox services.
//! - [`is_trusted`] runs before a message is forwarded and only admits known
//!   providers, institutional extensions, and plausible corporate domains.
//!
//! [`DomainPolicy`] layers deployment-specific allow/block lists on top.

use std::sync::LazyLock;

use regex::Regex;

/// Throwaway mail services rejected outright.
pub const DISPOSABLE_DOMAINS: &[&str] = &[
    "temp-mail.org",
    "tempmail.com",
    "guerrillamail.com",
    "10minutemail.com",
    "mailinator.com",
    "maildrop.cc",
    "throwaway.email",
    "yopmail.com",
    "temp-mail.io",
    "mohmal.com",
    "sharklasers.com",
    "guerrillamail.info",
    "spam4.me",
    "grr.la",
    "guerrillamail.biz",
    "guerrillamail.de",
    "getairmail.com",
    "tempinbox.com",
    "tempm.com",
    "tempmail.de",
    "dispostable.com",
    "trashmail.com",
    "fakeinbox.com",
    "emltmp.com",
    "mintemail.com",
    "getnada.com",
    "tempmailo.com",
    "emailondeck.com",
    "tmails.net",
    "mytemp.email",
    "temporary-mail.net",
    "mail.tm",
];

const DISPOSABLE_HINTS: &[&str] = &["temp", "fake", "trash", "disposable", "throwaway"];

/// Consumer and corporate mail domains that are always accepted.
pub const TRUSTED_PROVIDERS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "yahoo.co.uk",
    "yahoo.fr",
    "yahoo.de",
    "outlook.com",
    "hotmail.com",
    "live.com",
    "msn.com",
    "icloud.com",
    "me.com",
    "mac.com",
    "aol.com",
    "protonmail.com",
    "proton.me",
    "pm.me",
    "zoho.com",
    "yandex.com",
    "yandex.ru",
    "mail.com",
    "gmx.com",
    "gmx.net",
    "gmx.de",
    "microsoft.com",
    "apple.com",
    "amazon.com",
    "facebook.com",
    "meta.com",
    "google.com",
    "netflix.com",
    "tesla.com",
    "spacex.com",
];

/// Institutional suffixes that are always accepted.
pub const TRUSTED_EXTENSIONS: &[&str] = &[
    ".edu", ".gov", ".org", ".ac.uk", ".edu.au", ".edu.np", ".edu.in",
];

/// Top-level domains under which an unlisted corporate domain may pass.
pub const COMMON_TLDS: &[&str] = &[
    "com", "net", "co", "io", "org", "tech", "dev", "app", "digital", "solutions",
];

const SUSPICIOUS_PATTERNS: &[&str] = &[
    "temp",
    "fake",
    "trash",
    "disposable",
    "throwaway",
    "junk",
    "spam",
    "guerrilla",
    "10min",
    "20min",
    "minute",
    "tempor",
    "dispos",
    "instant",
    "burner",
    "anon",
    "hide",
    "privacy",
    "throw",
    "delete",
    "expire",
    "temporary",
];

// Long random-looking first label, or `word-random` first label.
static RANDOM_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{8,}\.").expect("random label pattern is valid"));
static HYPHEN_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+-[a-z0-9]+\.").expect("hyphen label pattern is valid"));

/// Returns `true` if `domain` is empty, a known throwaway service, or contains
/// an obvious throwaway hint.
pub fn is_disposable(domain: &str) -> bool {
    let domain = domain.to_lowercase();
    if domain.is_empty() {
        return true;
    }
    if DISPOSABLE_DOMAINS.contains(&domain.as_str()) {
        return true;
    }
    DISPOSABLE_HINTS.iter().any(|hint| domain.contains(hint))
}

/// Returns `true` if `domain` contains a suspicious keyword or has a
/// generated-looking first label.
pub fn has_suspicious_pattern(domain: &str) -> bool {
    if SUSPICIOUS_PATTERNS.iter().any(|p| domain.contains(p)) {
        return true;
    }
    RANDOM_LABEL_RE.is_match(domain) || HYPHEN_LABEL_RE.is_match(domain)
}

/// Returns `true` if mail from `domain` may be forwarded to the site owner.
pub fn is_trusted(domain: &str) -> bool {
    let domain = domain.to_lowercase();
    if domain.is_empty() {
        return false;
    }

    if TRUSTED_PROVIDERS.contains(&domain.as_str()) {
        return true;
    }

    if TRUSTED_EXTENSIONS.iter().any(|ext| domain.ends_with(ext)) {
        return true;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() >= 2 {
        let tld = labels[labels.len() - 1];
        if COMMON_TLDS.contains(&tld) && !has_suspicious_pattern(&domain) {
            return true;
        }
    }

    false
}

/// Built-in reputation lists plus deployment-specific overrides.
#[derive(Debug, Clone, Default)]
pub struct DomainPolicy {
    extra_trusted: Vec<String>,
    extra_blocked: Vec<String>,
}

impl DomainPolicy {
    pub fn new(extra_trusted: Vec<String>, extra_blocked: Vec<String>) -> Self {
        Self {
            extra_trusted: normalize(extra_trusted),
            extra_blocked: normalize(extra_blocked),
        }
    }

    fn trusted_override(&self, domain: &str) -> bool {
        self.extra_trusted.iter().any(|d| d == domain)
    }

    fn blocked_override(&self, domain: &str) -> bool {
        self.extra_blocked.iter().any(|d| d == domain)
    }

    /// Disposable check used before issuing a code.
    pub fn is_disposable(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        if self.blocked_override(&domain) {
            return true;
        }
        if self.trusted_override(&domain) {
            return false;
        }
        is_disposable(&domain)
    }

    /// Trust check used before forwarding a message.
    pub fn is_trusted(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        if self.blocked_override(&domain) {
            return false;
        }
        self.trusted_override(&domain) || is_trusted(&domain)
    }
}

fn normalize(domains: Vec<String>) -> Vec<String> {
    domains
        .into_iter()
        .map(|d| d.trim().trim_start_matches('@').to_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}
