//! Reserve tickets and open a pending transaction.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    EventRepository, EventTicketRepository, TransactionRepository, UserRepository,
};
use crate::domain::service_support::{
    map_event_repository_error, map_money_error, map_ticket_error, map_ticket_repository_error,
    map_transaction_error, map_transaction_repository_error, map_user_repository_error,
};
use crate::domain::{
    Error, EventId, NewTransaction, PaymentMethod, TicketError, TicketId, Transaction,
    TransactionId, UserId,
};

/// Purchase parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseTicketInput {
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
}

/// Sells tickets of published events.
pub struct PurchaseTicket<U, E, T, X> {
    users: Arc<U>,
    events: Arc<E>,
    tickets: Arc<T>,
    transactions: Arc<X>,
    clock: Arc<dyn Clock>,
}

impl<U, E, T, X> PurchaseTicket<U, E, T, X> {
    /// Use case over the purchase repositories.
    pub fn new(
        users: Arc<U>,
        events: Arc<E>,
        tickets: Arc<T>,
        transactions: Arc<X>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            events,
            tickets,
            transactions,
            clock,
        }
    }
}

impl<U, E, T, X> PurchaseTicket<U, E, T, X>
where
    U: UserRepository,
    E: EventRepository,
    T: EventTicketRepository,
    X: TransactionRepository,
{
    /// Reserve `quantity` tickets and record a pending transaction.
    ///
    /// The reservation is written with a compare-and-set on the sold count
    /// read here, so concurrent buyers cannot oversell.
    pub async fn execute(&self, input: PurchaseTicketInput) -> Result<Transaction, Error> {
        let (user, event, ticket) = tokio::join!(
            self.users.find_by_id(&input.user_id),
            self.events.find_by_id(&input.event_id),
            self.tickets.find_by_id(&input.ticket_id),
        );
        let user = user
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        let event = event
            .map_err(map_event_repository_error)?
            .ok_or_else(|| Error::not_found("Event not found"))?;
        if !event.is_published() {
            return Err(Error::conflict("Event is not published"));
        }
        let mut ticket = ticket
            .map_err(map_ticket_repository_error)?
            .filter(|ticket| ticket.event_id() == event.id())
            .ok_or_else(|| Error::not_found("Ticket not found for this event"))?;

        if input.quantity == 0 {
            return Err(map_ticket_error(TicketError::ZeroQuantity));
        }
        if !ticket.has_availability(input.quantity) {
            return Err(map_ticket_error(TicketError::SoldOut));
        }
        let amount = ticket
            .price()
            .multiply(input.quantity)
            .map_err(map_money_error)?;

        let now = self.clock.utc();
        let expected_sold = ticket.quantity_sold();
        ticket
            .reserve(input.quantity, now)
            .map_err(map_ticket_error)?;
        self.tickets
            .save_reservation(&ticket, expected_sold)
            .await
            .map_err(map_ticket_repository_error)?;

        let transaction = Transaction::open(
            TransactionId::random(),
            NewTransaction {
                user_id: Some(user.id()),
                event_id: event.id(),
                ticket_id: ticket.id(),
                quantity: input.quantity,
                amount,
                method: input.method,
            },
            now,
        )
        .map_err(map_transaction_error)?;
        self.transactions
            .save(&transaction)
            .await
            .map_err(map_transaction_repository_error)?;
        info!(
            transaction_id = %transaction.id(),
            ticket_id = %ticket.id(),
            quantity = input.quantity,
            "tickets reserved"
        );
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockEventRepository, MockEventTicketRepository, MockTransactionRepository,
        MockUserRepository, TicketPersistenceError,
    };
    use crate::domain::test_fixtures::{
        attendee, brl, draft_event, fixture_clock, published_event, ticket,
    };
    use crate::domain::{ErrorCode, Event, EventTicket, TransactionStatus, User};
    use rstest::rstest;

    struct Fixture {
        users: MockUserRepository,
        events: MockEventRepository,
        tickets: MockEventTicketRepository,
        transactions: MockTransactionRepository,
    }

    impl Fixture {
        fn new(user: Option<User>, event: Option<Event>, ticket: Option<EventTicket>) -> Self {
            let mut users = MockUserRepository::new();
            users.expect_find_by_id().return_once(move |_| Ok(user));
            let mut events = MockEventRepository::new();
            events.expect_find_by_id().return_once(move |_| Ok(event));
            let mut tickets = MockEventTicketRepository::new();
            tickets.expect_find_by_id().return_once(move |_| Ok(ticket));
            Self {
                users,
                events,
                tickets,
                transactions: MockTransactionRepository::new(),
            }
        }

        fn use_case(
            self,
        ) -> PurchaseTicket<
            MockUserRepository,
            MockEventRepository,
            MockEventTicketRepository,
            MockTransactionRepository,
        > {
            PurchaseTicket::new(
                Arc::new(self.users),
                Arc::new(self.events),
                Arc::new(self.tickets),
                Arc::new(self.transactions),
                fixture_clock(),
            )
        }
    }

    fn input(ticket: &EventTicket, quantity: u32) -> PurchaseTicketInput {
        PurchaseTicketInput {
            user_id: UserId::random(),
            event_id: ticket.event_id(),
            ticket_id: ticket.id(),
            quantity,
            method: PaymentMethod::Pix,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn reserves_tickets_and_opens_pending_transaction() {
        let event = published_event(UserId::random());
        let ticket = ticket(event.id(), "25.50", 10);
        let request = input(&ticket, 3);
        let mut fixture = Fixture::new(Some(attendee()), Some(event), Some(ticket));
        fixture
            .tickets
            .expect_save_reservation()
            .withf(|ticket, expected| ticket.quantity_sold() == 3 && *expected == 0)
            .times(1)
            .returning(|_, _| Ok(()));
        fixture
            .transactions
            .expect_save()
            .times(1)
            .returning(|_| Ok(()));

        let transaction = fixture.use_case().execute(request).await.expect("purchase");

        assert_eq!(transaction.status(), TransactionStatus::Pending);
        assert_eq!(transaction.quantity(), 3);
        assert_eq!(transaction.amount(), &brl("76.50"));
    }

    #[rstest]
    #[tokio::test]
    async fn unpublished_events_cannot_sell() {
        let event = draft_event(UserId::random());
        let ticket = ticket(event.id(), "10", 10);
        let request = input(&ticket, 1);
        let fixture = Fixture::new(Some(attendee()), Some(event), Some(ticket));

        let err = fixture.use_case().execute(request).await.expect_err("draft");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Event is not published");
    }

    #[rstest]
    #[tokio::test]
    async fn ticket_of_another_event_is_not_found() {
        let event = published_event(UserId::random());
        let foreign = ticket(crate::domain::EventId::random(), "10", 10);
        let mut request = input(&foreign, 1);
        request.event_id = event.id();
        let fixture = Fixture::new(Some(attendee()), Some(event), Some(foreign));

        let err = fixture.use_case().execute(request).await.expect_err("foreign");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Ticket not found for this event");
    }

    #[rstest]
    #[case::zero(0, ErrorCode::InvalidRequest, "Quantity must be greater than zero")]
    #[case::too_many(3, ErrorCode::Conflict, "Not enough tickets available")]
    #[tokio::test]
    async fn invalid_quantities_are_rejected(
        #[case] quantity: u32,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let event = published_event(UserId::random());
        let ticket = ticket(event.id(), "10", 2);
        let request = input(&ticket, quantity);
        let mut fixture = Fixture::new(Some(attendee()), Some(event), Some(ticket));
        fixture.tickets.expect_save_reservation().never();
        fixture.transactions.expect_save().never();

        let err = fixture.use_case().execute(request).await.expect_err("rejected");
        assert_eq!(err.code(), code);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[tokio::test]
    async fn stale_inventory_is_a_conflict() {
        let event = published_event(UserId::random());
        let ticket = ticket(event.id(), "10", 5);
        let request = input(&ticket, 1);
        let mut fixture = Fixture::new(Some(attendee()), Some(event), Some(ticket));
        fixture
            .tickets
            .expect_save_reservation()
            .return_once(|ticket, _| {
                Err(TicketPersistenceError::stale_inventory(ticket.id().to_string()))
            });
        fixture.transactions.expect_save().never();

        let err = fixture.use_case().execute(request).await.expect_err("stale");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Ticket inventory changed; please retry");
    }

    #[rstest]
    #[case::user(true, ErrorCode::NotFound, "User not found")]
    #[case::event(false, ErrorCode::NotFound, "Event not found")]
    #[tokio::test]
    async fn missing_entities_are_not_found(
        #[case] missing_user: bool,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let event = published_event(UserId::random());
        let ticket = ticket(event.id(), "10", 5);
        let request = input(&ticket, 1);
        let (user, event) = if missing_user {
            (None, Some(event))
        } else {
            (Some(attendee()), None)
        };
        let fixture = Fixture::new(user, event, Some(ticket));

        let err = fixture.use_case().execute(request).await.expect_err("missing");
        assert_eq!(err.code(), code);
        assert_eq!(err.message(), message);
    }
}
