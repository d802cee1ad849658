//! Shared helpers for HTTP integration tests.
//!
//! The application is assembled from public items only: real services over
//! the in-memory store, the production session middleware and the `/api/v1`
//! scope.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use ticketing::Trace;
use ticketing::domain::ports::PaymentGateways;
use ticketing::domain::{
    AccountService, EventService, InvitationService, PaymentProvider, PaymentRepositories,
    PaymentService, TicketService,
};
use ticketing::inbound::http::api_scope;
use ticketing::inbound::http::health::{HealthState, live, ready};
use ticketing::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use ticketing::inbound::http::state::{HttpState, HttpStatePorts};
use ticketing::inbound::http::webhook_signature::{
    WEBHOOK_SIGNATURE_HEADER, WebhookSecrets, sign_payload,
};
use ticketing::outbound::memory::InMemoryStore;
use ticketing::outbound::payments::{PaypalGateway, ZoopGateway};
use ticketing::outbound::security::Argon2PasswordHasher;

pub const PASSWORD: &str = "correct horse";
pub const WEBHOOK_SECRET: &str = "whsec_integration";

/// Real services over a fresh in-memory store.
pub fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::default());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
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
            .with_secret(PaymentProvider::Zoop, WEBHOOK_SECRET)
            .with_secret(PaymentProvider::Paypal, WEBHOOK_SECRET),
    )
}

/// Session settings with a fresh key and cookies usable over plain HTTP.
pub fn session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

/// Initialise the application the way the server binary wires it.
pub async fn init_app()
-> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    test::init_service(
        App::new()
            .app_data(health)
            .app_data(web::Data::new(memory_state()))
            .wrap(Trace)
            .service(api_scope().wrap(session_settings().middleware()))
            .service(ready)
            .service(live),
    )
    .await
}

/// Send `request` and return the status with the decoded JSON body, if any.
pub async fn send<S, B>(app: &S, request: Request) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, request).await;
    let status = res.status().as_u16();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

/// JSON request with an optional session cookie.
pub fn json_request(
    method: actix_web::http::Method,
    uri: &str,
    cookie: Option<&Cookie<'static>>,
    body: Option<Value>,
) -> Request {
    let mut req = test::TestRequest::default().method(method).uri(uri);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }
    req.to_request()
}

/// Provider notification signed the way the provider would sign it.
pub fn signed_webhook(provider: &str, body: &Value) -> Request {
    let raw = serde_json::to_vec(body).expect("encode notification");
    test::TestRequest::post()
        .uri(&format!("/api/v1/payments/webhooks/{provider}"))
        .insert_header(("content-type", "application/json"))
        .insert_header((
            WEBHOOK_SIGNATURE_HEADER,
            sign_payload(WEBHOOK_SECRET.as_bytes(), &raw),
        ))
        .set_payload(raw)
        .to_request()
}

/// Register an account, log it in and return its session cookie.
pub async fn sign_in<S, B>(app: &S, email: &str, user_type: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, _) = send(
        app,
        json_request(
            actix_web::http::Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "name": "Integration User",
                "email": email,
                "password": PASSWORD,
                "type": user_type,
            })),
        ),
    )
    .await;
    assert_eq!(status, 201, "register {email}");

    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200, "login {email}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie")
}
