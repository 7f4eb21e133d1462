//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login name, at most 64 characters.
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// `user` or `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tickets (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Text,
        description -> Text,
        category -> Text,
        /// One of the four workflow labels.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments written by ticket owners.
    user_comments (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Internal notes written by admins.
    admin_comments (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        author_id -> Uuid,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Operational log shown in the admin log viewer.
    event_logs (id) {
        id -> Uuid,
        /// Insertion order; breaks ties between equal timestamps.
        seq -> Int8,
        level -> Varchar,
        message -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tickets -> users (owner_id));
diesel::joinable!(user_comments -> users (author_id));
diesel::joinable!(admin_comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tickets,
    user_comments,
    admin_comments,
    event_logs,
);
