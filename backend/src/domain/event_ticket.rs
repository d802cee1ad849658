//! Ticket types offered for an event and their inventory.

use chrono::{DateTime, Utc};

use super::{EventId, Money, TicketId};

/// Minimum number of characters in a ticket name.
pub const TICKET_NAME_MIN: usize = 2;
/// Maximum number of characters in a ticket name.
pub const TICKET_NAME_MAX: usize = 255;

/// Validation and inventory errors for tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TicketError {
    /// The name is blank once trimmed.
    #[error("Ticket name is required")]
    NameRequired,
    /// The name is shorter than [`TICKET_NAME_MIN`] once trimmed.
    #[error("Ticket name must be at least {min} characters")]
    NameTooShort { min: usize },
    /// The name is longer than [`TICKET_NAME_MAX`].
    #[error("Ticket name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// The total quantity is zero.
    #[error("Total quantity must be greater than zero")]
    InvalidTotal,
    /// More tickets are sold than exist.
    #[error("Sold quantity must be between zero and the total quantity")]
    InvalidSold,
    /// A purchase asked for zero tickets.
    #[error("Quantity must be greater than zero")]
    ZeroQuantity,
    /// Fewer tickets remain than were requested.
    #[error("Not enough tickets available")]
    SoldOut,
}

impl TicketError {
    /// Wire name of the request field at fault, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NameRequired | Self::NameTooShort { .. } | Self::NameTooLong { .. } => {
                Some("name")
            }
            Self::InvalidTotal | Self::InvalidSold => Some("quantityTotal"),
            Self::ZeroQuantity => Some("quantity"),
            Self::SoldOut => None,
        }
    }
}

/// Fields supplied when defining a ticket type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetails {
    /// Name, 2 to 255 characters.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Price of one ticket.
    pub price: Money,
    /// Seats on sale.
    pub quantity_total: u32,
}

/// Partial update of a ticket type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketChanges {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New price.
    pub price: Option<Money>,
    /// New seat count.
    pub quantity_total: Option<u32>,
}

/// Stored representation used to rehydrate an [`EventTicket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    /// Ticket type identifier.
    pub id: TicketId,
    /// Event the record belongs to.
    pub event_id: EventId,
    /// Descriptive fields.
    pub details: TicketDetails,
    /// Seats already sold.
    pub quantity_sold: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A ticket type with its inventory counters.
///
/// ## Invariants
/// - `quantity_total > 0`
/// - `quantity_sold <= quantity_total`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTicket {
    id: TicketId,
    event_id: EventId,
    name: String,
    description: Option<String>,
    price: Money,
    quantity_total: u32,
    quantity_sold: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventTicket {
    /// Define a new ticket type with nothing sold.
    pub fn new(
        id: TicketId,
        event_id: EventId,
        details: TicketDetails,
        now: DateTime<Utc>,
    ) -> Result<Self, TicketError> {
        Self::restore(TicketRecord {
            id,
            event_id,
            details,
            quantity_sold: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a stored ticket, re-checking invariants.
    pub fn restore(record: TicketRecord) -> Result<Self, TicketError> {
        let TicketRecord {
            id,
            event_id,
            details,
            quantity_sold,
            created_at,
            updated_at,
        } = record;
        let name = details.name.trim();
        if name.is_empty() {
            return Err(TicketError::NameRequired);
        }
        let name_length = name.chars().count();
        if name_length < TICKET_NAME_MIN {
            return Err(TicketError::NameTooShort {
                min: TICKET_NAME_MIN,
            });
        }
        if name_length > TICKET_NAME_MAX {
            return Err(TicketError::NameTooLong {
                max: TICKET_NAME_MAX,
            });
        }
        if details.quantity_total == 0 {
            return Err(TicketError::InvalidTotal);
        }
        if quantity_sold > details.quantity_total {
            return Err(TicketError::InvalidSold);
        }
        Ok(Self {
            id,
            event_id,
            name: name.to_owned(),
            description: details
                .description
                .map(|raw| raw.trim().to_owned())
                .filter(|trimmed| !trimmed.is_empty()),
            price: details.price,
            quantity_total: details.quantity_total,
            quantity_sold,
            created_at,
            updated_at,
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> TicketId {
        self.id
    }

    /// Event this belongs to.
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Price of one ticket.
    pub fn price(&self) -> &Money {
        &self.price
    }

    /// Seats on sale.
    pub fn quantity_total(&self) -> u32 {
        self.quantity_total
    }

    /// Seats sold so far.
    pub fn quantity_sold(&self) -> u32 {
        self.quantity_sold
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification time.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Tickets still on sale.
    pub fn remaining_quantity(&self) -> u32 {
        self.quantity_total - self.quantity_sold
    }

    /// Whether `quantity` tickets can still be sold.
    pub fn has_availability(&self, quantity: u32) -> bool {
        self.remaining_quantity() >= quantity
    }

    /// Reserve `quantity` tickets.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use ticketing::domain::{
    ///     Currency, EventId, EventTicket, Money, TicketDetails, TicketError, TicketId,
    /// };
    ///
    /// let details = TicketDetails {
    ///     name: "General".into(),
    ///     description: None,
    ///     price: Money::from_cents(5_000, Currency::default()).unwrap(),
    ///     quantity_total: 2,
    /// };
    /// let mut ticket =
    ///     EventTicket::new(TicketId::random(), EventId::random(), details, Utc::now()).unwrap();
    /// ticket.reserve(2, Utc::now()).unwrap();
    /// assert_eq!(ticket.reserve(1, Utc::now()), Err(TicketError::SoldOut));
    /// ```
    pub fn reserve(&mut self, quantity: u32, now: DateTime<Utc>) -> Result<(), TicketError> {
        if quantity == 0 {
            return Err(TicketError::ZeroQuantity);
        }
        if !self.has_availability(quantity) {
            return Err(TicketError::SoldOut);
        }
        self.quantity_sold += quantity;
        self.updated_at = now;
        Ok(())
    }

    /// Apply a partial update. The ticket is unchanged when validation fails.
    pub fn apply(&mut self, changes: TicketChanges, now: DateTime<Utc>) -> Result<(), TicketError> {
        let details = TicketDetails {
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            description: changes
                .description
                .unwrap_or_else(|| self.description.clone()),
            price: changes.price.unwrap_or_else(|| self.price.clone()),
            quantity_total: changes.quantity_total.unwrap_or(self.quantity_total),
        };
        *self = Self::restore(TicketRecord {
            id: self.id,
            event_id: self.event_id,
            details,
            quantity_sold: self.quantity_sold,
            created_at: self.created_at,
            updated_at: now,
        })?;
        Ok(())
    }
}
