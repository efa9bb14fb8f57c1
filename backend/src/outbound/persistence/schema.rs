//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Linktree documents. `links` holds the ordered JSON array of links.
    linktrees (id) {
        id -> Uuid,
        fullname -> Text,
        bio -> Text,
        links -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` is unique; `linktree_id` is set at most once.
    users (id) {
        id -> Uuid,
        username -> Text,
        email -> Text,
        password_hash -> Text,
        linktree_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(users -> linktrees (linktree_id));
diesel::allow_tables_to_appear_in_same_query!(linktrees, users);
