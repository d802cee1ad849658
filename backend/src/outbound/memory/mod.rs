//! In-memory adapters used when no database is configured and in tests.
//!
//! A single [`InMemoryStore`] implements every repository port over shared
//! maps, mirroring the constraints the PostgreSQL schema enforces: unique
//! emails, slugs and tokens, cascading deletes, restricted deletes for
//! referenced rows, and guarded ticket reservations.

mod store;

pub use store::InMemoryStore;
