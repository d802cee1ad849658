//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and `bb8` connection pooling.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types; business rules stay in the domain.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) never leave
//!   this module.
//! - Database failures are mapped onto each port's persistence error.
//!
//! # Example
//!
//! ```ignore
//! use ticketing::outbound::persistence::{DbPool, DieselEventRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ticketing")).await?;
//! let events = DieselEventRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_event_repository;
mod diesel_event_ticket_repository;
mod diesel_invitation_repository;
mod diesel_transaction_repository;
mod diesel_user_repository;
mod diesel_wallet_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_event_repository::DieselEventRepository;
pub use diesel_event_ticket_repository::DieselEventTicketRepository;
pub use diesel_invitation_repository::DieselInvitationRepository;
pub use diesel_transaction_repository::DieselTransactionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_wallet_repository::DieselWalletRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
