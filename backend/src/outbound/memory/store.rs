//! Mutex-guarded maps implementing the repository ports.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    EventFilter, EventPersistenceError, EventRepository, EventTicketRepository,
    InvitationPersistenceError, InvitationRepository, TicketPersistenceError,
    TransactionPersistenceError, TransactionRepository, UserAccount, UserPersistenceError,
    UserRepository, WalletPersistenceError, WalletRepository,
};
use crate::domain::{
    Currency, Email, Event, EventId, EventTicket, Invitation, InvitationId, InvitationToken,
    Money, PasswordHash, PaymentProvider, Slug, TicketDetails, TicketId, TicketRecord,
    Transaction, TransactionId, TransactionStatus, User, UserId, Withdrawal,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserAccount>,
    events: HashMap<EventId, Event>,
    tickets: HashMap<TicketId, EventTicket>,
    transactions: HashMap<TransactionId, Transaction>,
    invitations: HashMap<InvitationId, Invitation>,
    withdrawals: Vec<Withdrawal>,
}

impl State {
    fn event_in_use(&self, id: EventId) -> bool {
        self.transactions.values().any(|tx| tx.event_id() == id)
    }

    fn ticket_in_use(&self, id: TicketId) -> bool {
        self.transactions.values().any(|tx| tx.ticket_id() == id)
    }
}

/// Shared in-memory backing store; clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("InMemoryStore")
            .field("users", &state.users.len())
            .field("events", &state.events.len())
            .field("tickets", &state.tickets.len())
            .field("transactions", &state.transactions.len())
            .field("invitations", &state.invitations.len())
            .field("withdrawals", &state.withdrawals.len())
            .finish()
    }
}

/// Rebuild `ticket` with a different sold count and timestamp.
fn with_sold(
    ticket: &EventTicket,
    quantity_sold: u32,
    updated_at: chrono::DateTime<chrono::Utc>,
) -> Result<EventTicket, TicketPersistenceError> {
    EventTicket::restore(TicketRecord {
        id: ticket.id(),
        event_id: ticket.event_id(),
        details: TicketDetails {
            name: ticket.name().to_owned(),
            description: ticket.description().map(str::to_owned),
            price: ticket.price().clone(),
            quantity_total: ticket.quantity_total(),
        },
        quantity_sold,
        created_at: ticket.created_at(),
        updated_at,
    })
    .map_err(|err| TicketPersistenceError::query(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        if state
            .users
            .values()
            .any(|account| account.user.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(
            user.id(),
            UserAccount {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .get(id)
            .map(|account| account.user.clone()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.find_account(email).await?.map(|account| account.user))
    }

    async fn find_account(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|account| account.user.email() == email)
            .cloned())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventPersistenceError> {
        Ok(self.state().events.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Event>, EventPersistenceError> {
        Ok(self
            .state()
            .events
            .values()
            .find(|event| event.slug() == slug)
            .cloned())
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, EventPersistenceError> {
        let mut events: Vec<Event> = self
            .state()
            .events
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        events.sort_by_key(|event| (event.start_date(), event.id()));
        Ok(events)
    }

    async fn save(&self, event: &Event) -> Result<(), EventPersistenceError> {
        let mut state = self.state();
        if state
            .events
            .values()
            .any(|other| other.id() != event.id() && other.slug() == event.slug())
        {
            return Err(EventPersistenceError::duplicate_slug(event.slug().as_ref()));
        }
        state.events.insert(event.id(), event.clone());
        Ok(())
    }

    async fn delete(&self, id: &EventId) -> Result<bool, EventPersistenceError> {
        let mut state = self.state();
        if !state.events.contains_key(id) {
            return Ok(false);
        }
        if state.event_in_use(*id) {
            return Err(EventPersistenceError::in_use(id.to_string()));
        }
        state.events.remove(id);
        state.tickets.retain(|_, ticket| ticket.event_id() != *id);
        state
            .invitations
            .retain(|_, invitation| invitation.event_id() != *id);
        Ok(true)
    }
}

#[async_trait]
impl EventTicketRepository for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &TicketId,
    ) -> Result<Option<EventTicket>, TicketPersistenceError> {
        Ok(self.state().tickets.get(id).cloned())
    }

    async fn find_by_event_id(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<EventTicket>, TicketPersistenceError> {
        let mut tickets: Vec<EventTicket> = self
            .state()
            .tickets
            .values()
            .filter(|ticket| ticket.event_id() == *event_id)
            .cloned()
            .collect();
        tickets.sort_by_key(|ticket| (ticket.created_at(), ticket.id()));
        Ok(tickets)
    }

    async fn save(&self, ticket: &EventTicket) -> Result<(), TicketPersistenceError> {
        let mut state = self.state();
        if !state.events.contains_key(&ticket.event_id()) {
            return Err(TicketPersistenceError::query(format!(
                "event {} does not exist",
                ticket.event_id()
            )));
        }
        let stored = match state.tickets.get(&ticket.id()) {
            Some(existing) => with_sold(ticket, existing.quantity_sold(), ticket.updated_at())?,
            None => ticket.clone(),
        };
        state.tickets.insert(stored.id(), stored);
        Ok(())
    }

    async fn save_reservation(
        &self,
        ticket: &EventTicket,
        expected_sold: u32,
    ) -> Result<(), TicketPersistenceError> {
        let mut state = self.state();
        let Some(existing) = state.tickets.get(&ticket.id()) else {
            return Err(TicketPersistenceError::stale_inventory(
                ticket.id().to_string(),
            ));
        };
        if existing.quantity_sold() != expected_sold {
            return Err(TicketPersistenceError::stale_inventory(
                ticket.id().to_string(),
            ));
        }
        let updated = with_sold(existing, ticket.quantity_sold(), ticket.updated_at())?;
        state.tickets.insert(updated.id(), updated);
        Ok(())
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, TicketPersistenceError> {
        let mut state = self.state();
        if !state.tickets.contains_key(id) {
            return Ok(false);
        }
        if state.ticket_in_use(*id) {
            return Err(TicketPersistenceError::in_use(id.to_string()));
        }
        state.tickets.remove(id);
        Ok(true)
    }
}

#[async_trait]
impl TransactionRepository for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, TransactionPersistenceError> {
        Ok(self.state().transactions.get(id).cloned())
    }

    async fn find_by_provider_reference(
        &self,
        provider: PaymentProvider,
        external_id: &str,
    ) -> Result<Option<Transaction>, TransactionPersistenceError> {
        Ok(self
            .state()
            .transactions
            .values()
            .find(|tx| {
                tx.provider_reference().is_some_and(|reference| {
                    reference.provider == provider && reference.external_id == external_id
                })
            })
            .cloned())
    }

    async fn list_paid_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Transaction>, TransactionPersistenceError> {
        let mut paid: Vec<Transaction> = self
            .state()
            .transactions
            .values()
            .filter(|tx| tx.user_id() == Some(*user_id) && tx.status() == TransactionStatus::Paid)
            .cloned()
            .collect();
        paid.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(paid)
    }

    async fn save(&self, transaction: &Transaction) -> Result<(), TransactionPersistenceError> {
        let mut state = self.state();
        if let Some(reference) = transaction.provider_reference() {
            let taken = state.transactions.values().any(|other| {
                other.id() != transaction.id() && other.provider_reference() == Some(reference)
            });
            if taken {
                return Err(TransactionPersistenceError::query(format!(
                    "provider reference {} is already in use",
                    reference.external_id
                )));
            }
        }
        state
            .transactions
            .insert(transaction.id(), transaction.clone());
        Ok(())
    }
}

#[async_trait]
impl InvitationRepository for InMemoryStore {
    async fn find_by_token(
        &self,
        token: &InvitationToken,
    ) -> Result<Option<Invitation>, InvitationPersistenceError> {
        Ok(self
            .state()
            .invitations
            .values()
            .find(|invitation| invitation.token() == token)
            .cloned())
    }

    async fn find_by_event_id(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<Invitation>, InvitationPersistenceError> {
        let mut invitations: Vec<Invitation> = self
            .state()
            .invitations
            .values()
            .filter(|invitation| invitation.event_id() == *event_id)
            .cloned()
            .collect();
        invitations.sort_by_key(|invitation| (invitation.created_at(), invitation.id()));
        Ok(invitations)
    }

    async fn save(&self, invitation: &Invitation) -> Result<(), InvitationPersistenceError> {
        self.state()
            .invitations
            .insert(invitation.id(), invitation.clone());
        Ok(())
    }
}

#[async_trait]
impl WalletRepository for InMemoryStore {
    async fn organizer_balance(
        &self,
        organizer_id: &UserId,
        currency: &Currency,
    ) -> Result<Money, WalletPersistenceError> {
        let state = self.state();
        let sales: i64 = state
            .transactions
            .values()
            .filter(|tx| tx.status() == TransactionStatus::Paid)
            .filter(|tx| tx.amount().currency() == currency)
            .filter(|tx| {
                state
                    .events
                    .get(&tx.event_id())
                    .is_some_and(|event| event.is_organized_by(*organizer_id))
            })
            .map(|tx| tx.amount().cents())
            .sum();
        let withdrawn: i64 = state
            .withdrawals
            .iter()
            .filter(|w| w.organizer_id == *organizer_id && w.amount.currency() == currency)
            .map(|w| w.amount.cents())
            .sum();
        Money::from_cents((sales - withdrawn).max(0), currency.clone())
            .map_err(|err| WalletPersistenceError::query(err.to_string()))
    }

    async fn withdraw(&self, withdrawal: &Withdrawal) -> Result<(), WalletPersistenceError> {
        self.state().withdrawals.push(withdrawal.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
