//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: define strongly typed ticketing entities and the use-cases that
//! operate on them, independent of HTTP and storage. Inbound adapters talk
//! to the driving ports in [`ports`]; outbound adapters implement the
//! driven ones.
//!
//! Public surface:
//! - Error and ErrorCode: transport-agnostic failure payload.
//! - Value objects: Money, Currency, Email, Slug, and typed identifiers.
//! - Aggregates: User, Event, EventTicket, Transaction, Invitation.
//! - Services: account, event, ticket, invitation, and payment services
//!   implementing the driving ports.

pub mod auth;
pub mod email;
pub mod error;
pub mod event;
pub mod event_ticket;
pub mod ids;
pub mod invitation;
pub mod money;
pub mod payment;
pub mod ports;
pub mod slug;
pub mod trace_id;
pub mod transaction;
pub mod use_cases;
pub mod user;
pub mod wallet;

mod account_service;
mod event_service;
mod invitation_service;
mod payment_service;
mod service_support;
mod ticket_service;

pub use self::account_service::AccountService;
pub use self::auth::{
    CredentialsError, LoginCredentials, PASSWORD_MIN_LEN, Password, PasswordHash, Registration,
};
pub use self::email::{Email, InvalidEmail};
pub use self::error::{Error, ErrorCode};
pub use self::event::{
    EVENT_LOCATION_MAX, EVENT_TITLE_MAX, EVENT_TITLE_MIN, Event, EventChanges, EventDetails,
    EventError, EventRecord, EventStatus,
};
pub use self::event_service::EventService;
pub use self::event_ticket::{
    EventTicket, TICKET_NAME_MAX, TICKET_NAME_MIN, TicketChanges, TicketDetails, TicketError,
    TicketRecord,
};
pub use self::ids::{EventId, InvitationId, TicketId, TransactionId, UserId, WithdrawalId};
pub use self::invitation::{
    Invitation, InvitationError, InvitationRecord, InvitationStatus, InvitationToken,
};
pub use self::invitation_service::InvitationService;
pub use self::money::{Currency, DEFAULT_CURRENCY, Money, MoneyError};
pub use self::payment::{
    Charge, ChargeRequest, ChargeStatus, PaymentNotification, PaymentProvider, UnknownProvider,
};
pub use self::payment_service::{PaymentRepositories, PaymentService};
pub use self::slug::{InvalidSlug, Slug};
pub use self::ticket_service::TicketService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transaction::{
    NewTransaction, PaymentMethod, ProviderReference, Transaction, TransactionError,
    TransactionRecord, TransactionStatus,
};
pub use self::user::{USER_NAME_MAX, USER_NAME_MIN, User, UserName, UserType, UserValidationError};
pub use self::wallet::Withdrawal;

#[cfg(test)]
pub(crate) mod test_fixtures;
