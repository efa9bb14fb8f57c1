//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{linktrees, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub linktree_id: Option<Uuid>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the linktrees table.
///
/// Also loadable from raw `RETURNING` clauses of the JSONB link updates.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = linktrees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LinktreeRow {
    pub id: Uuid,
    pub fullname: String,
    pub bio: String,
    pub links: serde_json::Value,
}

/// Insertable struct for creating new linktree records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = linktrees)]
pub(crate) struct NewLinktreeRow<'a> {
    pub id: Uuid,
    pub fullname: &'a str,
    pub bio: &'a str,
    pub links: serde_json::Value,
}
