//! Response payloads shared by the HTTP handlers.
//!
//! Domain aggregates keep their fields private; these DTOs flatten them into
//! camelCase JSON. Money amounts are rendered as JSON numbers with their
//! currency alongside, timestamps as RFC 3339 strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CheckoutOutcome, Purchase, WithdrawOutcome};
use crate::domain::{
    Charge, Event, EventStatus, EventTicket, Invitation, InvitationStatus, Money, PaymentMethod,
    PaymentProvider, Transaction, TransactionStatus, User, UserType,
};

/// Monetary amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoneyResponse {
    /// Decimal amount rendered as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 150.0)]
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[schema(example = "BRL")]
    pub currency: String,
}

impl From<&Money> for MoneyResponse {
    fn from(money: &Money) -> Self {
        Self {
            amount: money.amount(),
            currency: money.currency().to_string(),
        }
    }
}

/// Public view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User identifier.
    pub id: String,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Email address.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// `ORGANIZER` or `ATTENDEE`.
    #[serde(rename = "type")]
    pub user_type: UserType,
    /// Registration time, RFC 3339.
    pub created_at: String,
    /// Last profile change, RFC 3339.
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            user_type: user.user_type(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// Event as exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Event identifier.
    pub id: String,
    /// Organizer owning the event.
    pub organizer_id: String,
    /// URL slug derived from the title.
    #[schema(example = "rust-meetup")]
    pub slug: String,
    /// Event title.
    #[schema(example = "Rust Meetup")]
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Start time, RFC 3339.
    pub start_date: String,
    /// End time, RFC 3339.
    pub end_date: Option<String>,
    /// Venue or address.
    pub location: Option<String>,
    /// Attendee cap, if any.
    pub capacity: Option<u32>,
    /// `DRAFT` or `PUBLISHED`.
    pub status: EventStatus,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Last change, RFC 3339.
    pub updated_at: String,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            organizer_id: event.organizer_id().to_string(),
            slug: event.slug().as_ref().to_owned(),
            title: event.title().to_owned(),
            description: event.description().map(str::to_owned),
            start_date: event.start_date().to_rfc3339(),
            end_date: event.end_date().map(|date| date.to_rfc3339()),
            location: event.location().map(str::to_owned),
            capacity: event.capacity(),
            status: event.status(),
            created_at: event.created_at().to_rfc3339(),
            updated_at: event.updated_at().to_rfc3339(),
        }
    }
}

/// Ticket type with its inventory counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    /// Ticket type identifier.
    pub id: String,
    /// Event the record belongs to.
    pub event_id: String,
    /// Ticket type name.
    #[schema(example = "General admission")]
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Unit price rendered as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 50.0)]
    pub price: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Seats on sale.
    pub quantity_total: u32,
    /// Seats already sold.
    pub quantity_sold: u32,
    /// Seats still for sale.
    pub quantity_available: u32,
    /// Creation time, RFC 3339.
    pub created_at: String,
    /// Last change, RFC 3339.
    pub updated_at: String,
}

impl From<&EventTicket> for TicketResponse {
    fn from(ticket: &EventTicket) -> Self {
        Self {
            id: ticket.id().to_string(),
            event_id: ticket.event_id().to_string(),
            name: ticket.name().to_owned(),
            description: ticket.description().map(str::to_owned),
            price: ticket.price().amount(),
            currency: ticket.price().currency().to_string(),
            quantity_total: ticket.quantity_total(),
            quantity_sold: ticket.quantity_sold(),
            quantity_available: ticket.remaining_quantity(),
            created_at: ticket.created_at().to_rfc3339(),
            updated_at: ticket.updated_at().to_rfc3339(),
        }
    }
}

/// Purchase attempt and its payment state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Transaction identifier.
    pub id: String,
    /// Buyer, if the account still exists.
    pub user_id: Option<String>,
    /// Event the record belongs to.
    pub event_id: String,
    /// Ticket type bought.
    pub ticket_id: String,
    /// Number of tickets.
    pub quantity: u32,
    /// Total charged, rendered as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 100.0)]
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Payment status.
    pub status: TransactionStatus,
    /// How the buyer pays.
    pub method: PaymentMethod,
    /// Payment provider handling the charge.
    pub provider: Option<PaymentProvider>,
    /// Charge identifier at the provider.
    pub provider_reference: Option<String>,
    /// Checkout time, RFC 3339.
    pub created_at: String,
    /// Last status change, RFC 3339.
    pub updated_at: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(transaction: &Transaction) -> Self {
        let reference = transaction.provider_reference();
        Self {
            id: transaction.id().to_string(),
            user_id: transaction.user_id().map(|id| id.to_string()),
            event_id: transaction.event_id().to_string(),
            ticket_id: transaction.ticket_id().to_string(),
            quantity: transaction.quantity(),
            amount: transaction.amount().amount(),
            currency: transaction.amount().currency().to_string(),
            status: transaction.status(),
            method: transaction.method(),
            provider: reference.map(|r| r.provider),
            provider_reference: reference.map(|r| r.external_id.clone()),
            created_at: transaction.created_at().to_rfc3339(),
            updated_at: transaction.updated_at().to_rfc3339(),
        }
    }
}

/// Invitation, including the secret token for its organizer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    /// Invitation identifier.
    pub id: String,
    /// Event the record belongs to.
    pub event_id: String,
    /// Invitee email.
    pub email: String,
    /// Token from the invitation.
    pub token: String,
    /// Invitation status.
    pub status: InvitationStatus,
    /// When the invitation was sent, RFC 3339.
    pub created_at: String,
    /// When the invitee answered, RFC 3339.
    pub responded_at: Option<String>,
}

impl From<&Invitation> for InvitationResponse {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id().to_string(),
            event_id: invitation.event_id().to_string(),
            email: invitation.email().as_ref().to_owned(),
            token: invitation.token().to_string(),
            status: invitation.status(),
            created_at: invitation.created_at().to_rfc3339(),
            responded_at: invitation.responded_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Pending transaction plus what the client needs to pay it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Pending transaction.
    pub transaction: TransactionResponse,
    /// Charge opened at the provider.
    pub payment: Charge,
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        Self {
            transaction: TransactionResponse::from(&outcome.transaction),
            payment: outcome.charge,
        }
    }
}

/// Organizer balance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    /// Withdrawable funds.
    pub balance: MoneyResponse,
}

/// Recorded withdrawal and what remains afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResponse {
    /// Identifier of the recorded withdrawal.
    pub withdrawal_id: String,
    /// Amount taken out.
    pub withdrawn: MoneyResponse,
    /// Funds left afterwards.
    pub balance: MoneyResponse,
    /// When the withdrawal was recorded, RFC 3339.
    pub created_at: String,
}

impl From<WithdrawOutcome> for WithdrawResponse {
    fn from(outcome: WithdrawOutcome) -> Self {
        Self {
            withdrawal_id: outcome.withdrawal.id.to_string(),
            withdrawn: MoneyResponse::from(&outcome.withdrawal.amount),
            balance: MoneyResponse::from(&outcome.balance),
            created_at: outcome.withdrawal.created_at.to_rfc3339(),
        }
    }
}

/// Ticket bought by the current user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    /// Paid transaction.
    pub transaction: TransactionResponse,
    /// Event the tickets are for.
    pub event: PurchaseEventSummary,
    /// Ticket type bought.
    pub ticket: PurchaseTicketSummary,
}

/// Event fields shown next to a purchase.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseEventSummary {
    /// Event identifier.
    pub id: String,
    /// Event title.
    pub title: String,
    /// URL slug derived from the title.
    pub slug: String,
    /// Start time, RFC 3339.
    pub start_date: String,
    /// Venue or address.
    pub location: Option<String>,
}

/// Ticket type fields shown next to a purchase.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTicketSummary {
    /// Ticket type identifier.
    pub id: String,
    /// Ticket type name.
    pub name: String,
    /// Price of one ticket.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl From<&Purchase> for PurchaseResponse {
    fn from(purchase: &Purchase) -> Self {
        let Purchase {
            transaction,
            event,
            ticket,
        } = purchase;
        Self {
            transaction: TransactionResponse::from(transaction),
            event: PurchaseEventSummary {
                id: event.id().to_string(),
                title: event.title().to_owned(),
                slug: event.slug().as_ref().to_owned(),
                start_date: event.start_date().to_rfc3339(),
                location: event.location().map(str::to_owned),
            },
            ticket: PurchaseTicketSummary {
                id: ticket.id().to_string(),
                name: ticket.name().to_owned(),
                price: ticket.price().amount(),
                currency: ticket.price().currency().to_string(),
            },
        }
    }
}

/// Acknowledgement body for side-effect-only endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventId;
    use crate::domain::test_fixtures::{
        attendee, draft_event, organizer, pending_transaction, ticket,
    };
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    fn user_json_uses_type_key() {
        let value = serde_json::to_value(UserResponse::from(&organizer())).expect("json");
        assert_eq!(value["type"], "ORGANIZER");
        assert!(value.get("userType").is_none());
        assert!(value.get("passwordHash").is_none());
    }

    #[rstest]
    fn event_json_is_camel_case() {
        let event = draft_event(organizer().id());
        let value = serde_json::to_value(EventResponse::from(&event)).expect("json");
        assert_eq!(value["status"], "DRAFT");
        assert!(value.get("organizerId").is_some());
        assert!(value.get("start_date").is_none());
    }

    #[rstest]
    fn ticket_prices_are_numbers() {
        let ticket = ticket(EventId::random(), "50.00", 10);
        let value = serde_json::to_value(TicketResponse::from(&ticket)).expect("json");
        assert!(value["price"].is_number());
        assert_eq!(
            value["quantityAvailable"].as_u64(),
            value["quantityTotal"]
                .as_u64()
                .zip(value["quantitySold"].as_u64())
                .map(|(total, sold)| total - sold)
        );
    }

    #[rstest]
    fn money_amounts_are_numbers() {
        let ticket = ticket(EventId::random(), "50.00", 10);
        let transaction = pending_transaction(attendee().id(), &ticket);
        let value = serde_json::to_value(TransactionResponse::from(&transaction)).expect("json");
        assert!(value["amount"].is_number(), "amount was {}", value["amount"]);

        let money = MoneyResponse::from(transaction.amount());
        let value = serde_json::to_value(&money).expect("json");
        assert_eq!(value["amount"].as_f64(), Some(50.0));
        assert_eq!(value["currency"], "BRL");

        let back: MoneyResponse = serde_json::from_value(value).expect("decode");
        assert_eq!(back, money);
    }

    #[rstest]
    fn pending_transactions_have_no_provider() {
        let ticket = ticket(EventId::random(), "50.00", 10);
        let transaction = pending_transaction(attendee().id(), &ticket);
        let value = serde_json::to_value(TransactionResponse::from(&transaction)).expect("json");
        assert_eq!(value["status"], "PENDING");
        assert_eq!(value["provider"], Value::Null);
    }
}
