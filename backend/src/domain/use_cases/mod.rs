//! Core ticketing use-cases.
//!
//! Each use-case is a small struct over the driven ports it needs, exposing
//! a single `execute` method. Services compose them behind the driving
//! ports.

mod create_event;
mod invite_user_to_event;
mod publish_event;
mod purchase_ticket;
mod withdraw_balance;

pub use create_event::CreateEvent;
pub use invite_user_to_event::{InviteUserToEvent, InviteUserToEventInput};
pub use publish_event::PublishEvent;
pub use purchase_ticket::{PurchaseTicket, PurchaseTicketInput};
pub use withdraw_balance::{WithdrawBalance, WithdrawBalanceOutput};
