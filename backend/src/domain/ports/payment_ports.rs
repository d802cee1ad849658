//! Driving ports for checkout, provider notifications, and organizer wallets.
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::{
    Charge, Currency, Error, Event, EventId, EventTicket, Money, PaymentMethod, PaymentProvider,
    TicketId, Transaction, UserId, Withdrawal,
};

/// Request to buy tickets and open a provider charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Buyer.
    pub user_id: UserId,
    /// Event being bought.
    pub event_id: EventId,
    /// Ticket type being bought.
    pub ticket_id: TicketId,
    /// Number of tickets.
    pub quantity: u32,
    /// How the buyer pays.
    pub method: PaymentMethod,
    /// Provider override; the configured default is used when absent.
    pub provider: Option<PaymentProvider>,
}

/// Pending transaction plus the provider charge opened for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// Pending transaction.
    pub transaction: Transaction,
    /// Charge opened at the provider.
    pub charge: Charge,
}

/// Organizer request to withdraw funds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawRequest {
    /// Organizer withdrawing.
    pub organizer_id: UserId,
    /// Amount to withdraw.
    pub amount: Decimal,
    /// Currency of the balance.
    pub currency: Currency,
}

/// Recorded withdrawal and the balance left afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawOutcome {
    /// Recorded withdrawal.
    pub withdrawal: Withdrawal,
    /// Balance left afterwards.
    pub balance: Money,
}

/// Paid transaction with the event and ticket it bought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    /// Paid transaction.
    pub transaction: Transaction,
    /// Event the tickets are for.
    pub event: Event,
    /// Ticket type bought.
    pub ticket: EventTicket,
}

/// Driving port for checkout, notifications and withdrawals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentCommand: Send + Sync {
    /// Reserve tickets and open a charge at the provider.
    async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutOutcome, Error>;

    /// Apply a provider webhook to the matching transaction.
    async fn handle_notification(
        &self,
        provider: PaymentProvider,
        payload: Value,
    ) -> Result<Transaction, Error>;

    /// Withdraw from the organizer balance.
    async fn withdraw(&self, request: WithdrawRequest) -> Result<WithdrawOutcome, Error>;
}

/// Driving port for balances and purchases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentQuery: Send + Sync {
    /// Organizer balance in `currency`.
    async fn balance(&self, organizer_id: UserId, currency: Currency) -> Result<Money, Error>;

    /// Paid purchases of a user, newest first.
    async fn purchases(&self, user_id: UserId) -> Result<Vec<Purchase>, Error>;
}
