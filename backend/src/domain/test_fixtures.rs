//! Shared builders and a fixed clock for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;

use crate::domain::{
    Currency, Email, Event, EventDetails, EventId, EventTicket, Money, NewTransaction,
    PaymentMethod, Slug, TicketDetails, TicketId, Transaction, TransactionId, User, UserId,
    UserName, UserType,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 14, 18, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn brl(amount: &str) -> Money {
    let amount: Decimal = amount.parse().expect("decimal literal");
    Money::new(amount, Currency::default()).expect("valid money")
}

pub(crate) fn user(user_type: UserType) -> User {
    let id = UserId::random();
    User::new(
        id,
        UserName::new("Ada Lovelace").expect("valid name"),
        Email::new(format!("{id}@example.com")).expect("valid email"),
        user_type,
        fixture_timestamp(),
    )
}

pub(crate) fn organizer() -> User {
    user(UserType::Organizer)
}

pub(crate) fn attendee() -> User {
    user(UserType::Attendee)
}

pub(crate) fn event_details(title: &str) -> EventDetails {
    EventDetails {
        title: title.to_owned(),
        description: None,
        start_date: fixture_timestamp(),
        end_date: None,
        location: Some("Recife".to_owned()),
        capacity: None,
    }
}

pub(crate) fn draft_event(organizer_id: UserId) -> Event {
    Event::new(
        EventId::random(),
        organizer_id,
        Slug::from_title("Rust Summit"),
        event_details("Rust Summit"),
        fixture_timestamp(),
    )
    .expect("valid event")
}

pub(crate) fn published_event(organizer_id: UserId) -> Event {
    let mut event = draft_event(organizer_id);
    event.publish(fixture_timestamp());
    event
}

pub(crate) fn ticket(event_id: EventId, price: &str, total: u32) -> EventTicket {
    EventTicket::new(
        TicketId::random(),
        event_id,
        TicketDetails {
            name: "General admission".to_owned(),
            description: None,
            price: brl(price),
            quantity_total: total,
        },
        fixture_timestamp(),
    )
    .expect("valid ticket")
}

pub(crate) fn pending_transaction(user_id: UserId, ticket: &EventTicket) -> Transaction {
    Transaction::open(
        TransactionId::random(),
        NewTransaction {
            user_id: Some(user_id),
            event_id: ticket.event_id(),
            ticket_id: ticket.id(),
            quantity: 1,
            amount: ticket.price().clone(),
            method: PaymentMethod::Pix,
        },
        fixture_timestamp(),
    )
    .expect("valid transaction")
}
