//! Application settings loaded via OrthoConfig.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use ticketing::domain::PaymentProvider;
use ticketing::inbound::http::webhook_signature::WebhookSecrets;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Invalid values supplied through configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid payments provider `{value}`")]
    PaymentsProvider { value: String },
}

/// Configuration values controlling server startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TICKETING")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Provider used when a checkout does not name one.
    pub payments_provider: Option<String>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Base URL for mocked Zoop checkout links.
    pub zoop_checkout_url: Option<String>,
    /// Base URL for mocked PayPal approval links.
    pub paypal_approval_url: Option<String>,
    /// Shared secret signing Zoop notifications.
    pub zoop_webhook_secret: Option<String>,
    /// Shared secret signing PayPal notifications.
    pub paypal_webhook_secret: Option<String>,
}

impl AppSettings {
    /// Return the bind address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Return the configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the pool size, falling back to the default.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Return the default payment provider.
    pub fn payments_provider(&self) -> Result<PaymentProvider, SettingsError> {
        match self.payments_provider.as_deref() {
            None => Ok(PaymentProvider::default()),
            Some(raw) => raw
                .parse()
                .map_err(|_| SettingsError::PaymentsProvider {
                    value: raw.to_owned(),
                }),
        }
    }

    /// Collect the configured webhook secrets; blank values are skipped.
    pub fn webhook_secrets(&self) -> WebhookSecrets {
        [
            (PaymentProvider::Zoop, &self.zoop_webhook_secret),
            (PaymentProvider::Paypal, &self.paypal_webhook_secret),
        ]
        .into_iter()
        .filter_map(|(provider, secret)| {
            secret
                .as_deref()
                .map(str::trim)
                .map(|secret| (provider, secret))
        })
        .fold(WebhookSecrets::default(), |secrets, (provider, secret)| {
            secrets.with_secret(provider, secret)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for application settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 9] = [
        "TICKETING_BIND_ADDR",
        "TICKETING_DATABASE_URL",
        "TICKETING_DB_MAX_CONNECTIONS",
        "TICKETING_PAYMENTS_PROVIDER",
        "TICKETING_RUN_MIGRATIONS",
        "TICKETING_ZOOP_CHECKOUT_URL",
        "TICKETING_PAYPAL_APPROVAL_URL",
        "TICKETING_ZOOP_WEBHOOK_SECRET",
        "TICKETING_PAYPAL_WEBHOOK_SECRET",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    fn cleared_env() -> Vec<(&'static str, Option<String>)> {
        KEYS.iter().map(|key| (*key, None::<String>)).collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_env());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(
            settings.payments_provider().expect("default provider"),
            PaymentProvider::Zoop
        );
        assert!(settings.run_migrations);
        let secrets = settings.webhook_secrets();
        assert!(!secrets.is_configured(PaymentProvider::Zoop));
        assert!(!secrets.is_configured(PaymentProvider::Paypal));
    }

    #[rstest]
    fn webhook_secrets_are_read_per_provider() {
        let mut env = cleared_env();
        env.extend([
            ("TICKETING_ZOOP_WEBHOOK_SECRET", Some("zoop-shared".to_owned())),
            ("TICKETING_PAYPAL_WEBHOOK_SECRET", Some("   ".to_owned())),
        ]);
        let _guard = lock_env(env);

        let secrets = load_from_empty_args().webhook_secrets();
        assert!(secrets.is_configured(PaymentProvider::Zoop));
        assert!(!secrets.is_configured(PaymentProvider::Paypal));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut env = cleared_env();
        env.extend([
            ("TICKETING_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "TICKETING_DATABASE_URL",
                Some("postgres://localhost/events".to_owned()),
            ),
            ("TICKETING_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("TICKETING_PAYMENTS_PROVIDER", Some("paypal".to_owned())),
            ("TICKETING_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);
        let _guard = lock_env(env);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address").port(),
            9000
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/events"));
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(
            settings.payments_provider().expect("provider"),
            PaymentProvider::Paypal
        );
        assert!(!settings.run_migrations);
    }

    #[rstest]
    #[case::bad_address("TICKETING_BIND_ADDR", "not-an-address")]
    #[case::bad_provider("TICKETING_PAYMENTS_PROVIDER", "stripe")]
    fn invalid_values_are_reported(#[case] key: &'static str, #[case] value: &str) {
        let mut env = cleared_env();
        env.retain(|(name, _)| *name != key);
        env.push((key, Some(value.to_owned())));
        let _guard = lock_env(env);

        let settings = load_from_empty_args();
        let failed = settings.bind_addr().is_err() || settings.payments_provider().is_err();
        assert!(failed);
    }
}
