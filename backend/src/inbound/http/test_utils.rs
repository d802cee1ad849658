//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::json;

use super::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use super::state::{HttpState, HttpStatePorts};
use super::webhook_signature::WebhookSecrets;
use crate::domain::ports::PaymentGateways;
use crate::domain::test_fixtures::fixture_clock;
use crate::domain::{
    AccountService, EventService, InvitationService, PaymentProvider, PaymentRepositories,
    PaymentService, TicketService,
};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::payments::{PaypalGateway, ZoopGateway};
use crate::outbound::security::Argon2PasswordHasher;

pub(crate) const TEST_PASSWORD: &str = "secret1";
/// Secret shared with both mock payment providers.
pub(crate) const TEST_WEBHOOK_SECRET: &str = "whsec_test";

/// Production session middleware with a fresh key and insecure cookies so
/// plain-HTTP test requests carry them.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
    .middleware()
}

/// Real services over a fresh in-memory store and cheap password hashing.
pub(crate) fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::default());
    let clock = fixture_clock();
    let hasher = Arc::new(Argon2PasswordHasher::with_costs(8, 1, 1).expect("argon2 params"));
    let accounts = Arc::new(AccountService::new(store.clone(), hasher, clock.clone()));
    let events = Arc::new(EventService::new(store.clone(), store.clone(), clock.clone()));
    let tickets = Arc::new(TicketService::new(store.clone(), store.clone(), clock.clone()));
    let invitations = Arc::new(InvitationService::new(
        store.clone(),
        store.clone(),
        clock.clone(),
    ));
    let gateways = PaymentGateways::new(PaymentProvider::Zoop)
        .with_gateway(Arc::new(ZoopGateway::default()))
        .with_gateway(Arc::new(PaypalGateway::default()));
    let payments = Arc::new(PaymentService::new(
        PaymentRepositories {
            users: store.clone(),
            events: store.clone(),
            tickets: store.clone(),
            transactions: store.clone(),
            wallet: store,
        },
        gateways,
        clock,
    ));
    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        accounts_query: accounts,
        events: events.clone(),
        events_query: events,
        tickets: tickets.clone(),
        tickets_query: tickets,
        invitations: invitations.clone(),
        invitations_query: invitations,
        payments: payments.clone(),
        payments_query: payments,
    })
    .with_webhook_secrets(
        WebhookSecrets::default()
            .with_secret(PaymentProvider::Zoop, TEST_WEBHOOK_SECRET)
            .with_secret(PaymentProvider::Paypal, TEST_WEBHOOK_SECRET),
    )
}

/// Application exposing the full `/api/v1` surface over `state`.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(super::api_scope())
}

/// Register an account of `user_type`, log it in and return the session
/// cookie.
pub(crate) async fn login_cookie<S, B>(app: &S, email: &str, user_type: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "name": "Test User",
                "email": email,
                "password": TEST_PASSWORD,
                "type": user_type,
            }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "register failed: {}", res.status());

    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie")
}
