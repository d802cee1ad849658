//! Shared HTTP adapter state.
//!
//! Handlers receive this state through `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, EventCommand, EventQuery, InvitationCommand, InvitationQuery,
    PaymentCommand, PaymentQuery, TicketCommand, TicketQuery,
};
use crate::inbound::http::webhook_signature::WebhookSecrets;

/// Parameter object bundling every driving port used by the handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Registration and login.
    pub accounts: Arc<dyn AccountCommand>,
    /// Account lookups.
    pub accounts_query: Arc<dyn AccountQuery>,
    /// Event changes.
    pub events: Arc<dyn EventCommand>,
    /// Event reads.
    pub events_query: Arc<dyn EventQuery>,
    /// Ticket type changes.
    pub tickets: Arc<dyn TicketCommand>,
    /// Ticket type reads.
    pub tickets_query: Arc<dyn TicketQuery>,
    /// Invitation changes.
    pub invitations: Arc<dyn InvitationCommand>,
    /// Invitation reads.
    pub invitations_query: Arc<dyn InvitationQuery>,
    /// Checkout, notifications and withdrawals.
    pub payments: Arc<dyn PaymentCommand>,
    /// Balances and purchases.
    pub payments_query: Arc<dyn PaymentQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login.
    pub accounts: Arc<dyn AccountCommand>,
    /// Account lookups.
    pub accounts_query: Arc<dyn AccountQuery>,
    /// Event changes.
    pub events: Arc<dyn EventCommand>,
    /// Event reads.
    pub events_query: Arc<dyn EventQuery>,
    /// Ticket type changes.
    pub tickets: Arc<dyn TicketCommand>,
    /// Ticket type reads.
    pub tickets_query: Arc<dyn TicketQuery>,
    /// Invitation changes.
    pub invitations: Arc<dyn InvitationCommand>,
    /// Invitation reads.
    pub invitations_query: Arc<dyn InvitationQuery>,
    /// Checkout, notifications and withdrawals.
    pub payments: Arc<dyn PaymentCommand>,
    /// Balances and purchases.
    pub payments_query: Arc<dyn PaymentQuery>,
    /// Secrets verifying payment provider notifications.
    pub webhook_secrets: WebhookSecrets,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use ticketing::domain::ports::PaymentGateways;
    /// use ticketing::domain::{
    ///     AccountService, EventService, InvitationService, PaymentRepositories, PaymentService,
    ///     PaymentProvider, TicketService,
    /// };
    /// use ticketing::inbound::http::state::{HttpState, HttpStatePorts};
    /// use ticketing::outbound::memory::InMemoryStore;
    /// use ticketing::outbound::payments::ZoopGateway;
    /// use ticketing::outbound::security::Argon2PasswordHasher;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let clock = Arc::new(DefaultClock);
    /// let accounts = Arc::new(AccountService::new(
    ///     store.clone(),
    ///     Arc::new(Argon2PasswordHasher::default()),
    ///     clock.clone(),
    /// ));
    /// let events = Arc::new(EventService::new(store.clone(), store.clone(), clock.clone()));
    /// let tickets = Arc::new(TicketService::new(store.clone(), store.clone(), clock.clone()));
    /// let invitations = Arc::new(InvitationService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     clock.clone(),
    /// ));
    /// let gateways = PaymentGateways::new(PaymentProvider::Zoop)
    ///     .with_gateway(Arc::new(ZoopGateway::default()));
    /// let payments = Arc::new(PaymentService::new(
    ///     PaymentRepositories {
    ///         users: store.clone(),
    ///         events: store.clone(),
    ///         tickets: store.clone(),
    ///         transactions: store.clone(),
    ///         wallet: store.clone(),
    ///     },
    ///     gateways,
    ///     clock,
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     accounts: accounts.clone(),
    ///     accounts_query: accounts,
    ///     events: events.clone(),
    ///     events_query: events,
    ///     tickets: tickets.clone(),
    ///     tickets_query: tickets,
    ///     invitations: invitations.clone(),
    ///     invitations_query: invitations,
    ///     payments: payments.clone(),
    ///     payments_query: payments,
    /// });
    /// let _events = state.events_query.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            accounts_query,
            events,
            events_query,
            tickets,
            tickets_query,
            invitations,
            invitations_query,
            payments,
            payments_query,
        } = ports;
        Self {
            accounts,
            accounts_query,
            events,
            events_query,
            tickets,
            tickets_query,
            invitations,
            invitations_query,
            payments,
            payments_query,
            webhook_secrets: WebhookSecrets::default(),
        }
    }

    /// Replace the webhook secrets; without any, every notification is
    /// rejected.
    #[must_use]
    pub fn with_webhook_secrets(mut self, secrets: WebhookSecrets) -> Self {
        self.webhook_secrets = secrets;
        self
    }
}
