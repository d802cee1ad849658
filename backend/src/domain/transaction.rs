//! Ticket purchase transactions and their payment lifecycle.
//!
//! ```text
//! PENDING ──mark_as_paid──▶ PAID ──refund──▶ REFUNDED
//!    │                        ▲                 │
//!    └──cancel──▶ CANCELED    └───mark_as_paid──┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, Money, PaymentProvider, TicketId, TransactionId, UserId};

/// Invalid transitions and unknown enum values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// Canceled transactions cannot be paid.
    #[error("Cannot pay a canceled transaction")]
    PayCanceled,
    /// Paid transactions cannot be canceled.
    #[error("Cannot cancel a paid transaction")]
    CancelPaid,
    /// Only paid transactions can be refunded.
    #[error("Only paid transactions can be refunded")]
    RefundUnpaid,
    /// A purchase needs at least one ticket.
    #[error("Quantity must be greater than zero")]
    ZeroQuantity,
    /// Stored status is not recognised.
    #[error("Unknown transaction status: {value}")]
    UnknownStatus { value: String },
    /// Stored payment method is not recognised.
    #[error("Unknown payment method: {value}")]
    UnknownMethod { value: String },
}

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Awaiting payment.
    #[default]
    Pending,
    /// Settled by the provider.
    Paid,
    /// Abandoned or declined.
    Canceled,
    /// Paid, then returned to the buyer.
    Refunded,
}

impl TransactionStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Canceled => "CANCELED",
            Self::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PAID" => Ok(Self::Paid),
            "CANCELED" => Ok(Self::Canceled),
            "REFUNDED" => Ok(Self::Refunded),
            _ => Err(TransactionError::UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Brazilian instant payment.
    Pix,
    /// Credit card.
    CreditCard,
    /// Debit card.
    DebitCard,
    /// Cash at the door.
    Cash,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pix => "PIX",
            Self::CreditCard => "CREDIT_CARD",
            Self::DebitCard => "DEBIT_CARD",
            Self::Cash => "CASH",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PIX" => Ok(Self::Pix),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "DEBIT_CARD" => Ok(Self::DebitCard),
            "CASH" => Ok(Self::Cash),
            "OTHER" => Ok(Self::Other),
            _ => Err(TransactionError::UnknownMethod {
                value: s.to_owned(),
            }),
        }
    }
}

/// Charge reference held by an external payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReference {
    /// Provider holding the charge.
    pub provider: PaymentProvider,
    /// Charge identifier at the provider.
    pub external_id: String,
}

/// Stored representation used to rehydrate a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Identifier.
    pub id: TransactionId,
    /// Buyer, if the account still exists.
    pub user_id: Option<UserId>,
    /// Event the record belongs to.
    pub event_id: EventId,
    /// Ticket type bought.
    pub ticket_id: TicketId,
    /// Number of tickets.
    pub quantity: u32,
    /// Total charged.
    pub amount: Money,
    /// Payment status.
    pub status: TransactionStatus,
    /// How the buyer pays.
    pub method: PaymentMethod,
    /// Charge identifier at the provider.
    pub provider_reference: Option<ProviderReference>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A purchase of one or more tickets of a single type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionId,
    user_id: Option<UserId>,
    event_id: EventId,
    ticket_id: TicketId,
    quantity: u32,
    amount: Money,
    status: TransactionStatus,
    method: PaymentMethod,
    provider_reference: Option<ProviderReference>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields describing a new purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Buyer, if the account still exists.
    pub user_id: Option<UserId>,
    /// Event the record belongs to.
    pub event_id: EventId,
    /// Ticket type bought.
    pub ticket_id: TicketId,
    /// Number of tickets.
    pub quantity: u32,
    /// Total to charge.
    pub amount: Money,
    /// How the buyer pays.
    pub method: PaymentMethod,
}

impl Transaction {
    /// Open a pending transaction.
    pub fn open(
        id: TransactionId,
        purchase: NewTransaction,
        now: DateTime<Utc>,
    ) -> Result<Self, TransactionError> {
        Self::restore(TransactionRecord {
            id,
            user_id: purchase.user_id,
            event_id: purchase.event_id,
            ticket_id: purchase.ticket_id,
            quantity: purchase.quantity,
            amount: purchase.amount,
            status: TransactionStatus::Pending,
            method: purchase.method,
            provider_reference: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a stored transaction.
    pub fn restore(record: TransactionRecord) -> Result<Self, TransactionError> {
        if record.quantity == 0 {
            return Err(TransactionError::ZeroQuantity);
        }
        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            event_id: record.event_id,
            ticket_id: record.ticket_id,
            quantity: record.quantity,
            amount: record.amount,
            status: record.status,
            method: record.method,
            provider_reference: record.provider_reference,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Buyer, if the account still exists.
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Event this belongs to.
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Ticket type bought.
    pub fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    /// Number of tickets.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Total charged.
    pub fn amount(&self) -> &Money {
        &self.amount
    }

    /// Current status.
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Payment method.
    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Provider charge, once opened.
    pub fn provider_reference(&self) -> Option<&ProviderReference> {
        self.provider_reference.as_ref()
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification time.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Record the charge created at a payment provider.
    pub fn attach_provider(&mut self, reference: ProviderReference, now: DateTime<Utc>) {
        self.provider_reference = Some(reference);
        self.updated_at = now;
    }

    /// Settle the transaction. Already-paid transactions are left as is.
    pub fn mark_as_paid(&mut self, now: DateTime<Utc>) -> Result<(), TransactionError> {
        match self.status {
            TransactionStatus::Paid => Ok(()),
            TransactionStatus::Canceled => Err(TransactionError::PayCanceled),
            TransactionStatus::Pending | TransactionStatus::Refunded => {
                self.transition(TransactionStatus::Paid, now);
                Ok(())
            }
        }
    }

    /// Cancel the transaction. Already-canceled transactions are left as is.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), TransactionError> {
        match self.status {
            TransactionStatus::Paid => Err(TransactionError::CancelPaid),
            TransactionStatus::Canceled => Ok(()),
            TransactionStatus::Pending | TransactionStatus::Refunded => {
                self.transition(TransactionStatus::Canceled, now);
                Ok(())
            }
        }
    }

    /// Refund a paid transaction.
    pub fn refund(&mut self, now: DateTime<Utc>) -> Result<(), TransactionError> {
        if self.status != TransactionStatus::Paid {
            return Err(TransactionError::RefundUnpaid);
        }
        self.transition(TransactionStatus::Refunded, now);
        Ok(())
    }

    fn transition(&mut self, status: TransactionStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}
