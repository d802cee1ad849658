//! Payment service: checkout, provider notifications, and organizer wallets.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use mockable::Clock;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::ports::{
    CheckoutOutcome, CheckoutRequest, EventRepository, EventTicketRepository, PaymentCommand,
    PaymentGateways, PaymentQuery, Purchase, TransactionRepository, UserRepository,
    WalletRepository, WithdrawOutcome, WithdrawRequest,
};
use crate::domain::service_support::{
    map_event_repository_error, map_gateway_error, map_ticket_repository_error,
    map_transaction_error, map_transaction_repository_error, map_user_repository_error,
    map_wallet_repository_error,
};
use crate::domain::use_cases::{PurchaseTicket, PurchaseTicketInput, WithdrawBalance};
use crate::domain::{
    ChargeRequest, ChargeStatus, Currency, Error, Money, PaymentProvider, ProviderReference,
    Transaction, UserId,
};

/// Driven ports the payment service depends on.
pub struct PaymentRepositories<U, E, T, X, W> {
    /// Buyer lookups.
    pub users: Arc<U>,
    /// Event lookups.
    pub events: Arc<E>,
    /// Ticket inventory.
    pub tickets: Arc<T>,
    /// Transaction storage.
    pub transactions: Arc<X>,
    /// Organizer balances and withdrawals.
    pub wallet: Arc<W>,
}

/// Payment service over the ticketing repositories and provider gateways.
pub struct PaymentService<U, E, T, X, W> {
    users: Arc<U>,
    events: Arc<E>,
    tickets: Arc<T>,
    transactions: Arc<X>,
    wallet: Arc<W>,
    gateways: PaymentGateways,
    purchase_ticket: PurchaseTicket<U, E, T, X>,
    withdraw_balance: WithdrawBalance<W>,
    clock: Arc<dyn Clock>,
}

impl<U, E, T, X, W> PaymentService<U, E, T, X, W> {
    /// Create a new payment service.
    pub fn new(
        repositories: PaymentRepositories<U, E, T, X, W>,
        gateways: PaymentGateways,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let PaymentRepositories {
            users,
            events,
            tickets,
            transactions,
            wallet,
        } = repositories;
        Self {
            purchase_ticket: PurchaseTicket::new(
                Arc::clone(&users),
                Arc::clone(&events),
                Arc::clone(&tickets),
                Arc::clone(&transactions),
                Arc::clone(&clock),
            ),
            withdraw_balance: WithdrawBalance::new(Arc::clone(&wallet), Arc::clone(&clock)),
            users,
            events,
            tickets,
            transactions,
            wallet,
            gateways,
            clock,
        }
    }
}

impl<U, E, T, X, W> PaymentService<U, E, T, X, W>
where
    U: UserRepository,
    E: EventRepository,
    T: EventTicketRepository,
    X: TransactionRepository,
    W: WalletRepository,
{
    async fn ensure_organizer(&self, user_id: &UserId) -> Result<(), Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("Organizer not found"))?;
        if user.is_organizer() {
            Ok(())
        } else {
            Err(Error::forbidden("Only organizers have a balance"))
        }
    }

    async fn save_transaction(&self, transaction: &Transaction) -> Result<(), Error> {
        self.transactions
            .save(transaction)
            .await
            .map_err(map_transaction_repository_error)
    }

    async fn load_purchase(&self, transaction: Transaction) -> Result<Purchase, Error> {
        let (event_id, ticket_id) = (transaction.event_id(), transaction.ticket_id());
        let (event, ticket) = tokio::join!(
            self.events.find_by_id(&event_id),
            self.tickets.find_by_id(&ticket_id),
        );
        let event = event.map_err(map_event_repository_error)?.ok_or_else(|| {
            Error::internal(format!("event missing for transaction {}", transaction.id()))
        })?;
        let ticket = ticket.map_err(map_ticket_repository_error)?.ok_or_else(|| {
            Error::internal(format!("ticket missing for transaction {}", transaction.id()))
        })?;
        Ok(Purchase {
            transaction,
            event,
            ticket,
        })
    }
}

#[async_trait]
impl<U, E, T, X, W> PaymentCommand for PaymentService<U, E, T, X, W>
where
    U: UserRepository,
    E: EventRepository,
    T: EventTicketRepository,
    X: TransactionRepository,
    W: WalletRepository,
{
    async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutOutcome, Error> {
        let provider = request
            .provider
            .unwrap_or_else(|| self.gateways.default_provider());
        let gateway = self.gateways.resolve(Some(provider)).ok_or_else(|| {
            Error::service_unavailable(format!("Payment provider {provider} is not configured"))
        })?;

        let mut transaction = self
            .purchase_ticket
            .execute(PurchaseTicketInput {
                user_id: request.user_id,
                event_id: request.event_id,
                ticket_id: request.ticket_id,
                quantity: request.quantity,
                method: request.method,
            })
            .await?;

        let charge_request = ChargeRequest {
            transaction_id: transaction.id(),
            amount: transaction.amount().clone(),
            method: transaction.method(),
            description: format!(
                "{} ticket(s) for event {}",
                transaction.quantity(),
                transaction.event_id()
            ),
        };
        let charge = match gateway.create_charge(&charge_request).await {
            Ok(charge) => charge,
            Err(err) => {
                warn!(transaction_id = %transaction.id(), error = %err, "charge creation failed");
                transaction
                    .cancel(self.clock.utc())
                    .map_err(map_transaction_error)?;
                self.save_transaction(&transaction).await?;
                return Err(map_gateway_error(err));
            }
        };

        transaction.attach_provider(
            ProviderReference {
                provider: charge.provider,
                external_id: charge.external_id.clone(),
            },
            self.clock.utc(),
        );
        self.save_transaction(&transaction).await?;
        info!(
            transaction_id = %transaction.id(),
            provider = %charge.provider,
            external_id = %charge.external_id,
            "checkout started"
        );
        Ok(CheckoutOutcome {
            transaction,
            charge,
        })
    }

    async fn handle_notification(
        &self,
        provider: PaymentProvider,
        payload: Value,
    ) -> Result<Transaction, Error> {
        let gateway = self.gateways.resolve(Some(provider)).ok_or_else(|| {
            Error::invalid_request(format!("Payment provider {provider} is not configured"))
        })?;
        let notification = gateway
            .parse_notification(&payload)
            .map_err(map_gateway_error)?;
        let mut transaction = self
            .transactions
            .find_by_provider_reference(provider, &notification.external_id)
            .await
            .map_err(map_transaction_repository_error)?
            .ok_or_else(|| Error::not_found("Transaction not found"))?;

        let before = transaction.status();
        let now = self.clock.utc();
        match notification.status {
            ChargeStatus::Paid => transaction.mark_as_paid(now),
            ChargeStatus::Canceled | ChargeStatus::Failed => transaction.cancel(now),
            ChargeStatus::Pending => Ok(()),
        }
        .map_err(map_transaction_error)?;

        if transaction.status() != before {
            self.save_transaction(&transaction).await?;
            info!(
                transaction_id = %transaction.id(),
                from = %before,
                to = %transaction.status(),
                "transaction status changed by provider"
            );
        }
        Ok(transaction)
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<WithdrawOutcome, Error> {
        self.ensure_organizer(&request.organizer_id).await?;
        let output = self
            .withdraw_balance
            .execute(request.organizer_id, request.amount, request.currency)
            .await?;
        Ok(WithdrawOutcome {
            withdrawal: output.withdrawal,
            balance: output.remaining,
        })
    }
}

#[async_trait]
impl<U, E, T, X, W> PaymentQuery for PaymentService<U, E, T, X, W>
where
    U: UserRepository,
    E: EventRepository,
    T: EventTicketRepository,
    X: TransactionRepository,
    W: WalletRepository,
{
    async fn balance(&self, organizer_id: UserId, currency: Currency) -> Result<Money, Error> {
        self.ensure_organizer(&organizer_id).await?;
        self.wallet
            .organizer_balance(&organizer_id, &currency)
            .await
            .map_err(map_wallet_repository_error)
    }

    async fn purchases(&self, user_id: UserId) -> Result<Vec<Purchase>, Error> {
        let transactions = self
            .transactions
            .list_paid_for_user(&user_id)
            .await
            .map_err(map_transaction_repository_error)?;
        try_join_all(
            transactions
                .into_iter()
                .map(|transaction| self.load_purchase(transaction)),
        )
        .await
    }
}

#[cfg(test)]
#[path = "payment_service_tests.rs"]
mod tests;
