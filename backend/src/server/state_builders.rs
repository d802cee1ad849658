//! Builders wiring repositories and services into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use ticketing::domain::ports::{
    EventRepository, EventTicketRepository, InvitationRepository, PasswordHasher,
    PaymentGateways, TransactionRepository, UserRepository, WalletRepository,
};
use ticketing::domain::{
    AccountService, EventService, InvitationService, PaymentRepositories, PaymentService,
    TicketService,
};
use ticketing::inbound::http::state::{HttpState, HttpStatePorts};
use ticketing::outbound::memory::InMemoryStore;
use ticketing::outbound::persistence::{
    DbPool, DieselEventRepository, DieselEventTicketRepository, DieselInvitationRepository,
    DieselTransactionRepository, DieselUserRepository, DieselWalletRepository,
};
use ticketing::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Driven adapters backing every service.
struct Repositories<U, E, T, I, X, W> {
    users: Arc<U>,
    events: Arc<E>,
    tickets: Arc<T>,
    invitations: Arc<I>,
    transactions: Arc<X>,
    wallet: Arc<W>,
}

impl
    Repositories<
        DieselUserRepository,
        DieselEventRepository,
        DieselEventTicketRepository,
        DieselInvitationRepository,
        DieselTransactionRepository,
        DieselWalletRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            events: Arc::new(DieselEventRepository::new(pool.clone())),
            tickets: Arc::new(DieselEventTicketRepository::new(pool.clone())),
            invitations: Arc::new(DieselInvitationRepository::new(pool.clone())),
            transactions: Arc::new(DieselTransactionRepository::new(pool.clone())),
            wallet: Arc::new(DieselWalletRepository::new(pool.clone())),
        }
    }
}

impl
    Repositories<
        InMemoryStore,
        InMemoryStore,
        InMemoryStore,
        InMemoryStore,
        InMemoryStore,
        InMemoryStore,
    >
{
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::default());
        Self {
            users: Arc::clone(&store),
            events: Arc::clone(&store),
            tickets: Arc::clone(&store),
            invitations: Arc::clone(&store),
            transactions: Arc::clone(&store),
            wallet: store,
        }
    }
}

/// Assemble the service graph over one set of repositories.
fn assemble<U, E, T, I, X, W, H>(
    repositories: Repositories<U, E, T, I, X, W>,
    hasher: Arc<H>,
    gateways: PaymentGateways,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    E: EventRepository + 'static,
    T: EventTicketRepository + 'static,
    I: InvitationRepository + 'static,
    X: TransactionRepository + 'static,
    W: WalletRepository + 'static,
    H: PasswordHasher + 'static,
{
    let Repositories {
        users,
        events,
        tickets,
        invitations,
        transactions,
        wallet,
    } = repositories;

    let accounts = Arc::new(AccountService::new(
        Arc::clone(&users),
        hasher,
        Arc::clone(&clock),
    ));
    let event_service = Arc::new(EventService::new(
        Arc::clone(&users),
        Arc::clone(&events),
        Arc::clone(&clock),
    ));
    let ticket_service = Arc::new(TicketService::new(
        Arc::clone(&events),
        Arc::clone(&tickets),
        Arc::clone(&clock),
    ));
    let invitation_service = Arc::new(InvitationService::new(
        Arc::clone(&events),
        invitations,
        Arc::clone(&clock),
    ));
    let payments = Arc::new(PaymentService::new(
        PaymentRepositories {
            users,
            events,
            tickets,
            transactions,
            wallet,
        },
        gateways,
        clock,
    ));

    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        accounts_query: accounts,
        events: event_service.clone(),
        events_query: event_service,
        tickets: ticket_service.clone(),
        tickets_query: ticket_service,
        invitations: invitation_service.clone(),
        invitations_query: invitation_service,
        payments: payments.clone(),
        payments_query: payments,
    })
}

/// Build the shared HTTP state, using Diesel repositories when a pool is
/// configured and the in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher::default());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let gateways = config.gateways.clone();

    let state = match &config.db_pool {
        Some(pool) => assemble(Repositories::diesel(pool), hasher, gateways, clock),
        None => assemble(Repositories::in_memory(), hasher, gateways, clock),
    };
    web::Data::new(state.with_webhook_secrets(config.webhook_secrets.clone()))
}
