//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use ticketing::domain::ports::PaymentGateways;
use ticketing::inbound::http::session_config::SessionSettings;
use ticketing::inbound::http::webhook_signature::WebhookSecrets;
use ticketing::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) gateways: PaymentGateways,
    pub(crate) webhook_secrets: WebhookSecrets,
}

impl ServerConfig {
    /// Construct a server configuration with in-memory persistence.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, gateways: PaymentGateways) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            gateways,
            webhook_secrets: WebhookSecrets::default(),
        }
    }

    /// Secrets used to verify payment provider notifications.
    #[must_use]
    pub fn with_webhook_secrets(mut self, secrets: WebhookSecrets) -> Self {
        self.webhook_secrets = secrets;
        self
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses the Diesel repositories instead of the
    /// in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
