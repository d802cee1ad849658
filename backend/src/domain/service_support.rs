//! Internal helpers shared by domain services: port error mapping and
//! entity loading.

use serde_json::json;

use crate::domain::ports::{
    EventPersistenceError, InvitationPersistenceError, PasswordHasherError,
    PaymentGatewayError, TicketPersistenceError, TransactionPersistenceError,
    UserPersistenceError, WalletPersistenceError,
};
use crate::domain::{
    Error, EventError, InvitationError, MoneyError, TicketError, TransactionError,
};

pub(crate) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("A user with this email already exists")
        }
    }
}

pub(crate) fn map_event_repository_error(error: EventPersistenceError) -> Error {
    match error {
        EventPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("event repository unavailable: {message}"))
        }
        EventPersistenceError::Query { message } => {
            Error::internal(format!("event repository error: {message}"))
        }
        EventPersistenceError::DuplicateSlug { slug } => {
            Error::conflict(format!("Event slug {slug} is already taken"))
        }
        EventPersistenceError::InUse { .. } => {
            Error::conflict("Event has transactions and cannot be deleted")
        }
    }
}

pub(crate) fn map_ticket_repository_error(error: TicketPersistenceError) -> Error {
    match error {
        TicketPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("ticket repository unavailable: {message}"))
        }
        TicketPersistenceError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
        TicketPersistenceError::StaleInventory { .. } => {
            Error::conflict("Ticket inventory changed; please retry")
        }
        TicketPersistenceError::InUse { .. } => {
            Error::conflict("Ticket has transactions and cannot be deleted")
        }
    }
}

pub(crate) fn map_transaction_repository_error(error: TransactionPersistenceError) -> Error {
    match error {
        TransactionPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("transaction repository unavailable: {message}"))
        }
        TransactionPersistenceError::Query { message } => {
            Error::internal(format!("transaction repository error: {message}"))
        }
    }
}

pub(crate) fn map_invitation_repository_error(error: InvitationPersistenceError) -> Error {
    match error {
        InvitationPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("invitation repository unavailable: {message}"))
        }
        InvitationPersistenceError::Query { message } => {
            Error::internal(format!("invitation repository error: {message}"))
        }
    }
}

pub(crate) fn map_wallet_repository_error(error: WalletPersistenceError) -> Error {
    match error {
        WalletPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("wallet repository unavailable: {message}"))
        }
        WalletPersistenceError::Query { message } => {
            Error::internal(format!("wallet repository error: {message}"))
        }
    }
}

pub(crate) fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password hasher failed: {error}"))
}

pub(crate) fn map_gateway_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::Unavailable { message } => {
            Error::service_unavailable(format!("payment provider unavailable: {message}"))
        }
        PaymentGatewayError::Rejected { message } => {
            Error::conflict(format!("Payment rejected: {message}"))
        }
        PaymentGatewayError::InvalidNotification { message } => {
            Error::invalid_request(format!("Invalid payment notification: {message}"))
        }
    }
}

/// Field rule violations name the offending field in `details.field`.
pub(crate) fn map_event_error(error: EventError) -> Error {
    with_field(Error::invalid_request(error.to_string()), error.field())
}

/// Ticket rule violations; sell-outs are conflicts, the rest bad input.
pub(crate) fn map_ticket_error(error: TicketError) -> Error {
    match error {
        TicketError::SoldOut => Error::conflict(error.to_string()),
        _ => with_field(Error::invalid_request(error.to_string()), error.field()),
    }
}

fn with_field(error: Error, field: Option<&'static str>) -> Error {
    match field {
        Some(field) => error.with_details(json!({ "field": field, "code": "invalid_value" })),
        None => error,
    }
}

/// Invalid state transitions are conflicts with the stored state.
pub(crate) fn map_transaction_error(error: TransactionError) -> Error {
    match error {
        TransactionError::PayCanceled
        | TransactionError::CancelPaid
        | TransactionError::RefundUnpaid => Error::conflict(error.to_string()),
        _ => Error::invalid_request(error.to_string()),
    }
}

pub(crate) fn map_invitation_error(error: InvitationError) -> Error {
    match error {
        InvitationError::NotPending => Error::conflict(error.to_string()),
        _ => Error::invalid_request(error.to_string()),
    }
}

pub(crate) fn map_money_error(error: MoneyError) -> Error {
    Error::invalid_request(error.to_string())
}
