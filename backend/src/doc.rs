//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: request and response bodies, the error envelope and the
//!   status enums clients switch on
//! - **Security**: session cookie authentication scheme
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Charge, Error, ErrorCode, EventStatus, InvitationStatus, PaymentMethod, PaymentProvider,
    TransactionStatus, UserType,
};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::dto::{
    BalanceResponse, CheckoutResponse, EventResponse, InvitationResponse, MoneyResponse,
    PurchaseEventSummary, PurchaseResponse, PurchaseTicketSummary, SuccessResponse,
    TicketResponse, TransactionResponse, UserResponse, WithdrawResponse,
};
use crate::inbound::http::events::{CreateEventBody, UpdateEventBody};
use crate::inbound::http::health::ProbeResponse;
use crate::inbound::http::invitations::InviteBody;
use crate::inbound::http::payments::{CheckoutBody, WithdrawBody};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::tickets::{CreateTicketBody, UpdateTicketBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Signed session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ticketing backend API",
        description = "Event publishing, ticket sales, invitations and organizer payouts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::get_event_by_slug,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::update_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::events::publish_event,
        crate::inbound::http::tickets::list_tickets,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::update_ticket,
        crate::inbound::http::tickets::delete_ticket,
        crate::inbound::http::invitations::list_invitations,
        crate::inbound::http::invitations::create_invitation,
        crate::inbound::http::invitations::get_invitation,
        crate::inbound::http::invitations::accept_invitation,
        crate::inbound::http::invitations::decline_invitation,
        crate::inbound::http::payments::checkout,
        crate::inbound::http::payments::webhook,
        crate::inbound::http::payments::balance,
        crate::inbound::http::payments::withdraw,
        crate::inbound::http::users::my_tickets,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserType,
        EventStatus,
        InvitationStatus,
        TransactionStatus,
        PaymentMethod,
        PaymentProvider,
        Charge,
        RegisterRequest,
        LoginRequest,
        CreateEventBody,
        UpdateEventBody,
        CreateTicketBody,
        UpdateTicketBody,
        InviteBody,
        CheckoutBody,
        WithdrawBody,
        MoneyResponse,
        UserResponse,
        EventResponse,
        TicketResponse,
        TransactionResponse,
        InvitationResponse,
        CheckoutResponse,
        BalanceResponse,
        WithdrawResponse,
        PurchaseResponse,
        PurchaseEventSummary,
        PurchaseTicketSummary,
        SuccessResponse,
        ProbeResponse,
    )),
    tags(
        (name = "auth", description = "Registration and cookie sessions"),
        (name = "events", description = "Event management and discovery"),
        (name = "tickets", description = "Ticket types sold for an event"),
        (name = "invitations", description = "Organizer invitations and responses"),
        (name = "payments", description = "Checkout, provider webhooks and payouts"),
        (name = "users", description = "Operations on the signed-in user"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
