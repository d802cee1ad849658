//! HTTP inbound adapter exposing the REST API.

pub mod auth;
pub mod dto;
pub mod error;
pub mod events;
pub mod health;
pub mod invitations;
pub mod payments;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
pub mod users;
pub mod validation;
pub mod webhook_signature;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Register every `/api/v1` handler and the JSON error renderers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(events::list_events)
        .service(events::create_event)
        .service(events::get_event_by_slug)
        .service(events::get_event)
        .service(events::update_event)
        .service(events::delete_event)
        .service(events::publish_event)
        .service(tickets::list_tickets)
        .service(tickets::create_ticket)
        .service(tickets::update_ticket)
        .service(tickets::delete_ticket)
        .service(invitations::list_invitations)
        .service(invitations::create_invitation)
        .service(invitations::get_invitation)
        .service(invitations::accept_invitation)
        .service(invitations::decline_invitation)
        .service(payments::checkout)
        .service(payments::webhook)
        .service(payments::balance)
        .service(payments::withdraw)
        .service(users::my_tickets);
}

/// The versioned API scope.
pub fn api_scope() -> Scope {
    web::scope("/api/v1").configure(configure)
}
