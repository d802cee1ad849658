//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! Money columns hold integer minor units next to a currency code.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// PHC-encoded Argon2 hash.
        password_hash -> Text,
        /// `ORGANIZER` or `ATTENDEE`.
        user_type -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Events owned by an organizer. `slug` is unique.
    events (id) {
        id -> Uuid,
        organizer_id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        slug -> Varchar,
        start_date -> Timestamptz,
        end_date -> Nullable<Timestamptz>,
        location -> Nullable<Varchar>,
        capacity -> Nullable<Int4>,
        /// `DRAFT` or `PUBLISHED`.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ticket types with inventory counters; `quantity_sold <= quantity_total`.
    event_tickets (id) {
        id -> Uuid,
        event_id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        price_cents -> Int8,
        currency -> Varchar,
        quantity_total -> Int4,
        quantity_sold -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ticket purchases and their payment state.
    transactions (id) {
        id -> Uuid,
        user_id -> Nullable<Uuid>,
        event_id -> Uuid,
        ticket_id -> Uuid,
        quantity -> Int4,
        amount_cents -> Int8,
        currency -> Varchar,
        status -> Varchar,
        method -> Varchar,
        provider -> Nullable<Varchar>,
        /// Provider charge identifier, unique per provider.
        provider_reference -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Invitations addressed to an email; `token` is unique.
    event_invitations (id) {
        id -> Uuid,
        event_id -> Uuid,
        email -> Varchar,
        token -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
        responded_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Funds withdrawn by organizers.
    withdrawals (id) {
        id -> Uuid,
        organizer_id -> Uuid,
        amount_cents -> Int8,
        currency -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(events -> users (organizer_id));
diesel::joinable!(event_tickets -> events (event_id));
diesel::joinable!(transactions -> events (event_id));
diesel::joinable!(transactions -> event_tickets (ticket_id));
diesel::joinable!(event_invitations -> events (event_id));
diesel::joinable!(withdrawals -> users (organizer_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    events,
    event_tickets,
    transactions,
    event_invitations,
    withdrawals,
);
