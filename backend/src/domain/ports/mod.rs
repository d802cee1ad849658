//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`PaymentGateway`])
//! are implemented by outbound adapters. Driving ports (`*Command`,
//! `*Query`) are implemented by domain services and consumed by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_ports;
mod event_ports;
mod event_repository;
mod event_ticket_repository;
mod invitation_ports;
mod invitation_repository;
mod password_hasher;
mod payment_gateway;
mod payment_ports;
mod ticket_ports;
mod transaction_repository;
mod user_repository;
mod wallet_repository;

#[cfg(test)]
pub use account_ports::{MockAccountCommand, MockAccountQuery};
pub use account_ports::{AccountCommand, AccountQuery};
#[cfg(test)]
pub use event_ports::{MockEventCommand, MockEventQuery};
pub use event_ports::{CreateEventRequest, EventCommand, EventQuery, UpdateEventRequest};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventFilter, EventPersistenceError, EventRepository};
#[cfg(test)]
pub use event_ticket_repository::MockEventTicketRepository;
pub use event_ticket_repository::{EventTicketRepository, TicketPersistenceError};
#[cfg(test)]
pub use invitation_ports::{MockInvitationCommand, MockInvitationQuery};
pub use invitation_ports::{InvitationCommand, InvitationQuery, InvitationResponse, InviteRequest};
#[cfg(test)]
pub use invitation_repository::MockInvitationRepository;
pub use invitation_repository::{InvitationPersistenceError, InvitationRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{PaymentGateway, PaymentGatewayError, PaymentGateways};
#[cfg(test)]
pub use payment_ports::{MockPaymentCommand, MockPaymentQuery};
pub use payment_ports::{
    CheckoutOutcome, CheckoutRequest, PaymentCommand, PaymentQuery, Purchase, WithdrawOutcome,
    WithdrawRequest,
};
#[cfg(test)]
pub use ticket_ports::{MockTicketCommand, MockTicketQuery};
pub use ticket_ports::{CreateTicketRequest, TicketCommand, TicketQuery, UpdateTicketRequest};
#[cfg(test)]
pub use transaction_repository::MockTransactionRepository;
pub use transaction_repository::{TransactionPersistenceError, TransactionRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserAccount, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use wallet_repository::MockWalletRepository;
pub use wallet_repository::{WalletPersistenceError, WalletRepository};
