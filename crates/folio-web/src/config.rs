use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use folio_core::{ServiceSettings, SiteProfile};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub site: SiteProfile,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub domains: DomainsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Outbound mail relay. Gmail with an app password by default.
#[derive(Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Full `smtp://` / `smtps://` URL; takes precedence over host and port.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Sender address; falls back to `username`.
    #[serde(default)]
    pub from: Option<String>,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

impl SmtpConfig {
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    pub fn from_address(&self) -> &str {
        self.from
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    #[serde(default = "default_code_ttl_seconds")]
    pub code_ttl_seconds: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_attempt_window_seconds")]
    pub attempt_window_seconds: u64,
    #[serde(default = "default_true")]
    pub require_verified_email: bool,
}

impl VerificationConfig {
    pub fn settings(&self) -> ServiceSettings {
        ServiceSettings {
            code_ttl: Duration::from_secs(self.code_ttl_seconds),
            max_attempts: self.max_attempts,
            attempt_window: Duration::from_secs(self.attempt_window_seconds),
            require_verified: self.require_verified_email,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainsConfig {
    #[serde(default)]
    pub extra_trusted: Vec<String>,
    #[serde(default)]
    pub extra_blocked: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rpm")]
    pub requests_per_minute: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty means same-origin only.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub discord_webhook_url: Option<String>,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_smtp_host() -> String { "smtp.gmail.com".to_string() }
fn default_smtp_port() -> u16 { 587 }
fn default_code_ttl_seconds() -> u64 { 600 }
fn default_max_attempts() -> u32 { 3 }
fn default_attempt_window_seconds() -> u64 { 3600 }
fn default_rpm() -> u32 { 10 }
fn default_true() -> bool { true }

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            url: None,
            username: String::new(),
            password: String::new(),
            from: None,
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: default_code_ttl_seconds(),
            max_attempts: default_max_attempts(),
            attempt_window_seconds: default_attempt_window_seconds(),
            require_verified_email: true,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { requests_per_minute: default_rpm() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            smtp: SmtpConfig::default(),
            site: SiteProfile::default(),
            verification: VerificationConfig::default(),
            domains: DomainsConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
            tls: TlsConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("FOLIO_WEB_CONFIG").map(PathBuf::from).ok();

        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {e}", path.display()))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("FOLIO_BIND_ADDR") {
            self.bind_addr = addr.parse()?;
        }

        // Legacy credential variable names.
        if let Some(user) = lookup("EMAIL_USER") {
            self.smtp.username = user;
        }
        if let Some(pass) = lookup("EMAIL_PASS") {
            self.smtp.password = pass;
        }
        if let Some(host) = lookup("FOLIO_SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(url) = lookup("FOLIO_SMTP_URL") {
            self.smtp.url = Some(url);
        }

        if let Some(email) = lookup("FOLIO_OWNER_EMAIL") {
            self.site.owner_email = email;
        }
        if let Some(name) = lookup("FOLIO_OWNER_NAME") {
            self.site.owner_name = name;
        }

        if let Some(origins) = lookup("FOLIO_ALLOWED_ORIGINS") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Some(url) = lookup("FOLIO_DISCORD_WEBHOOK_URL") {
            self.notify.discord_webhook_url = Some(url);
        }

        if let Some(cert) = lookup("FOLIO_TLS_CERT") {
            self.tls.cert_path = Some(cert);
        }
        if let Some(key) = lookup("FOLIO_TLS_KEY") {
            self.tls.key_path = Some(key);
        }

        Ok(())
    }

    /// Fills derived defaults and rejects unusable configurations.
    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.site.owner_email.is_empty() && !self.smtp.username.is_empty() {
            self.site.owner_email = self.smtp.username.clone();
        }
        if self.site.owner_email.is_empty() {
            anyhow::bail!(
                "No owner inbox configured. Set site.owner_email or FOLIO_OWNER_EMAIL \
                 (or EMAIL_USER to deliver to the relay account)."
            );
        }

        if self.verification.max_attempts == 0 {
            anyhow::bail!("verification.max_attempts must be at least 1");
        }
        if self.verification.code_ttl_seconds == 0 {
            anyhow::bail!("verification.code_ttl_seconds must be positive");
        }

        if !self.smtp.has_credentials() && self.smtp.url.is_none() {
            tracing::warn!(
                "No SMTP credentials configured (EMAIL_USER / EMAIL_PASS). \
                 Outgoing mail will only be logged."
            );
        }

        if !self.verification.require_verified_email {
            tracing::warn!("Email verification is disabled; /api/contact forwards unverified senders.");
        }

        Ok(())
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls.cert_path.is_some() && self.tls.key_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.verification.code_ttl_seconds, 600);
        assert_eq!(config.verification.max_attempts, 3);
        assert_eq!(config.verification.attempt_window_seconds, 3600);
        assert!(config.verification.require_verified_email);
        assert_eq!(config.rate_limit.requests_per_minute, 10);
        assert!(config.cors.allowed_origins.is_empty());
        assert!(!config.tls_enabled());
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("folio.toml");
        fs::write(
            &path,
            r#"
bind_addr = "127.0.0.1:3001"

[smtp]
host = "smtp.example.com"
port = 2525
username = "relay@example.com"
password = "app-password"
from = "noreply@example.com"

[site]
owner_name = "Sam Rivera"
owner_email = "sam@example.com"
tagline = "Full Stack Developer"
links = [{ label = "GitHub", url = "https://github.com/sam" }]

[verification]
code_ttl_seconds = 300
max_attempts = 5
attempt_window_seconds = 1800
require_verified_email = false

[domains]
extra_trusted = ["studio.xyz"]
extra_blocked = ["spammy.com"]

[rate_limit]
requests_per_minute = 30

[cors]
allowed_origins = ["https://sam.dev"]

[notify]
discord_webhook_url = "https://discord.com/api/webhooks/1/abc"
"#,
        )
        .unwrap();

        let config = ServerConfig::from_file(&path).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3001".parse().unwrap());
        assert_eq!(config.smtp.port, 2525);
        assert_eq!(config.smtp.from_address(), "noreply@example.com");
        assert!(config.smtp.has_credentials());
        assert_eq!(config.site.owner_name, "Sam Rivera");
        assert_eq!(config.site.links.len(), 1);
        assert_eq!(config.verification.max_attempts, 5);
        assert!(!config.verification.require_verified_email);
        assert_eq!(config.domains.extra_trusted, vec!["studio.xyz"]);
        assert_eq!(config.rate_limit.requests_per_minute, 30);
        assert_eq!(config.cors.allowed_origins, vec!["https://sam.dev"]);
        assert!(config.notify.discord_webhook_url.is_some());

        let settings = config.verification.settings();
        assert_eq!(settings.code_ttl, Duration::from_secs(300));
        assert_eq!(settings.attempt_window, Duration::from_secs(1800));
        assert!(!settings.require_verified);
    }

    #[test]
    fn load_partial_toml_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("folio.toml");
        fs::write(&path, "[site]\nowner_email = \"sam@example.com\"\n").unwrap();

        let config = ServerConfig::from_file(&path).unwrap();

        assert_eq!(config.site.owner_email, "sam@example.com");
        assert_eq!(config.site.owner_name, "Portfolio Owner");
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.verification.code_ttl_seconds, 600);
    }

    #[test]
    fn load_invalid_toml_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("folio.toml");
        fs::write(&path, "this is not [[[ toml").unwrap();
        assert!(ServerConfig::from_file(&path).is_err());
    }

    #[test]
    fn load_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(ServerConfig::from_file(&tmp.path().join("missing.toml")).is_err());
    }

    #[test]
    fn env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env(env(&[
                ("FOLIO_BIND_ADDR", "127.0.0.1:9000"),
                ("EMAIL_USER", "me@gmail.com"),
                ("EMAIL_PASS", "secret"),
                ("FOLIO_OWNER_NAME", "Sam"),
                ("FOLIO_ALLOWED_ORIGINS", "https://a.dev, https://b.dev,"),
                ("FOLIO_TLS_CERT", "/etc/cert.pem"),
                ("FOLIO_TLS_KEY", "/etc/key.pem"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.smtp.username, "me@gmail.com");
        assert_eq!(config.smtp.from_address(), "me@gmail.com");
        assert!(config.smtp.has_credentials());
        assert_eq!(config.site.owner_name, "Sam");
        assert_eq!(config.cors.allowed_origins, vec!["https://a.dev", "https://b.dev"]);
        assert!(config.tls_enabled());
    }

    #[test]
    fn debug_redacts_smtp_password() {
        let mut config = ServerConfig::default();
        config.smtp.password = "app-password".to_string();
        let debug = format!("{:?}", config);
        assert!(debug.contains("SmtpConfig"));
        assert!(!debug.contains("app-password"));
    }

    #[test]
    fn invalid_bind_addr_env_fails() {
        let mut config = ServerConfig::default();
        assert!(config.apply_env(env(&[("FOLIO_BIND_ADDR", "nope")])).is_err());
    }

    #[test]
    fn validate_defaults_owner_to_relay_account() {
        let mut config = ServerConfig::default();
        config.smtp.username = "me@gmail.com".to_string();

        config.validate().unwrap();

        assert_eq!(config.site.owner_email, "me@gmail.com");
    }

    #[test]
    fn validate_requires_owner_inbox() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let mut config = ServerConfig::default();
        config.site.owner_email = "sam@example.com".to_string();
        config.verification.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn example_config_parses() {
        let config: ServerConfig =
            toml::from_str(include_str!("../folio-web.example.toml")).unwrap();

        assert_eq!(config.site.links.len(), 2);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert!(config.notify.discord_webhook_url.is_none());
    }
}
