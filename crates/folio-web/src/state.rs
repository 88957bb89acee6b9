use std::sync::Arc;

use folio_core::{ContactService, DomainPolicy, Mailer};

use crate::config::ServerConfig;
use crate::notify::DiscordNotifier;

#[derive(Clone)]
pub struct AppState {
    pub contact: Arc<ContactService>,
    /// Present when a Discord webhook is configured.
    pub notifier: Option<Arc<DiscordNotifier>>,
}

impl AppState {
    pub fn new(config: &ServerConfig, mailer: Arc<dyn Mailer>) -> Self {
        let policy = DomainPolicy::new(
            config.domains.extra_trusted.clone(),
            config.domains.extra_blocked.clone(),
        );
        let contact = ContactService::new(
            config.verification.settings(),
            policy,
            config.site.clone(),
            mailer,
        );
        let notifier = config
            .notify
            .discord_webhook_url
            .clone()
            .filter(|u| !u.is_empty())
            .map(|url| Arc::new(DiscordNotifier::new(url)));

        Self {
            contact: Arc::new(contact),
            notifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::LogMailer;

    fn config_with_webhook(url: Option<&str>) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.notify.discord_webhook_url = url.map(str::to_string);
        config
    }

    #[test]
    fn empty_webhook_url_disables_notifier() {
        let state = AppState::new(&config_with_webhook(Some("")), Arc::new(LogMailer));
        assert!(state.notifier.is_none());

        let state = AppState::new(&config_with_webhook(None), Arc::new(LogMailer));
        assert!(state.notifier.is_none());
    }

    #[test]
    fn webhook_url_enables_notifier() {
        let state = AppState::new(
            &config_with_webhook(Some("https://discord.com/api/webhooks/1/abc")),
            Arc::new(LogMailer),
        );
        assert!(state.notifier.is_some());
    }
}
