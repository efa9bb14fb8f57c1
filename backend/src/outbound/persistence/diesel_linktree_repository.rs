//! PostgreSQL-backed `LinktreeRepository` implementation using Diesel ORM.
//!
//! Links live in a JSONB array column. Each link primitive is one
//! `UPDATE ... RETURNING` statement that rewrites the array from the row's
//! current value, so concurrent primitives against the same tree serialise on
//! the row lock and none of them overwrites another's change.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Jsonb, Text, Uuid as SqlUuid};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::json;

use crate::domain::ports::{LinktreePersistenceError, LinktreeRepository};
use crate::domain::{Link, LinkFields, LinkId, LinkMatch, Linktree, LinktreeId, ProfileText};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{LinktreeRow, NewLinktreeRow};
use super::pool::{DbPool, PoolError};
use super::schema::linktrees;

const PUSH_LINK_SQL: &str = r"
UPDATE linktrees
SET links = links || $2, updated_at = NOW()
WHERE id = $1
RETURNING id, fullname, bio, links
";

// $2 names the JSON key to match on (`id` or `name`), $3 its value.
const REPLACE_LINK_SQL: &str = r"
UPDATE linktrees AS t
SET links = (
        SELECT jsonb_agg(
            CASE WHEN e.ord = (
                    SELECT MIN(f.ord)
                    FROM jsonb_array_elements(t.links) WITH ORDINALITY AS f(value, ord)
                    WHERE f.value ->> $2 = $3
                )
                THEN e.value || jsonb_build_object('name', $4::text, 'link', $5::text, 'visits', $6::bigint)
                ELSE e.value
            END
            ORDER BY e.ord
        )
        FROM jsonb_array_elements(t.links) WITH ORDINALITY AS e(value, ord)
    ),
    updated_at = NOW()
WHERE t.id = $1
  AND EXISTS (
        SELECT 1 FROM jsonb_array_elements(t.links) AS f(value)
        WHERE f.value ->> $2 = $3
  )
RETURNING t.id, t.fullname, t.bio, t.links
";

const REMOVE_LINK_SQL: &str = r"
UPDATE linktrees AS t
SET links = COALESCE(
        (
            SELECT jsonb_agg(e.value ORDER BY e.ord)
            FROM jsonb_array_elements(t.links) WITH ORDINALITY AS e(value, ord)
            WHERE e.value ->> 'id' IS DISTINCT FROM $2
        ),
        '[]'::jsonb
    ),
    updated_at = NOW()
WHERE t.id = $1
  AND EXISTS (
        SELECT 1 FROM jsonb_array_elements(t.links) AS f(value)
        WHERE f.value ->> 'id' = $2
  )
RETURNING t.id, t.fullname, t.bio, t.links
";

/// Diesel-backed implementation of the `LinktreeRepository` port.
#[derive(Clone)]
pub struct DieselLinktreeRepository {
    pool: DbPool,
}

impl DieselLinktreeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Resolve an `UPDATE` that touched nothing into the precise failure.
    async fn explain_miss(
        conn: &mut AsyncPgConnection,
        id: &LinktreeId,
    ) -> LinktreePersistenceError {
        let exists = linktrees::table
            .find(*id.as_uuid())
            .select(linktrees::id)
            .first::<uuid::Uuid>(conn)
            .await
            .optional();
        match exists {
            Ok(Some(_)) => LinktreePersistenceError::link_not_found(),
            Ok(None) => LinktreePersistenceError::not_found(*id),
            Err(err) => map_diesel_error(err),
        }
    }

    async fn update_profile(
        &self,
        id: &LinktreeId,
        column: ProfileColumn,
        value: &ProfileText,
    ) -> Result<Linktree, LinktreePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = diesel::update(linktrees::table.find(*id.as_uuid()));
        let updated = match column {
            ProfileColumn::Bio => {
                target
                    .set((
                        linktrees::bio.eq(value.as_str()),
                        linktrees::updated_at.eq(diesel::dsl::now),
                    ))
                    .returning(LinktreeRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
            ProfileColumn::Fullname => {
                target
                    .set((
                        linktrees::fullname.eq(value.as_str()),
                        linktrees::updated_at.eq(diesel::dsl::now),
                    ))
                    .returning(LinktreeRow::as_returning())
                    .get_result(&mut conn)
                    .await
            }
        }
        .optional()
        .map_err(map_diesel_error)?;

        updated
            .map(row_to_linktree)
            .transpose()?
            .ok_or_else(|| LinktreePersistenceError::not_found(*id))
    }
}

#[derive(Clone, Copy)]
enum ProfileColumn {
    Bio,
    Fullname,
}

fn map_pool_error(error: PoolError) -> LinktreePersistenceError {
    map_basic_pool_error(error, LinktreePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LinktreePersistenceError {
    map_basic_diesel_error(
        error,
        LinktreePersistenceError::query,
        LinktreePersistenceError::connection,
    )
}

fn row_to_linktree(row: LinktreeRow) -> Result<Linktree, LinktreePersistenceError> {
    let links: Vec<Link> = serde_json::from_value(row.links).map_err(|err| {
        LinktreePersistenceError::query(format!("stored links could not be decoded: {err}"))
    })?;
    Ok(Linktree::new(
        LinktreeId::from_uuid(row.id),
        row.fullname,
        row.bio,
        links,
    ))
}

fn encode<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, LinktreePersistenceError> {
    serde_json::to_value(value)
        .map_err(|err| LinktreePersistenceError::query(format!("link encoding failed: {err}")))
}

fn selector_parts(selector: &LinkMatch) -> (&'static str, String) {
    match selector {
        LinkMatch::Id(id) => ("id", id.to_string()),
        LinkMatch::Name(name) => ("name", name.clone()),
    }
}

#[async_trait]
impl LinktreeRepository for DieselLinktreeRepository {
    async fn create(&self, tree: &Linktree) -> Result<Linktree, LinktreePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewLinktreeRow {
            id: *tree.id().as_uuid(),
            fullname: tree.fullname(),
            bio: tree.bio(),
            links: encode(&tree.links())?,
        };
        let inserted = diesel::insert_into(linktrees::table)
            .values(&row)
            .returning(LinktreeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_linktree(inserted)
    }

    async fn get(&self, id: &LinktreeId) -> Result<Option<Linktree>, LinktreePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        linktrees::table
            .find(*id.as_uuid())
            .select(LinktreeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_linktree)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Linktree>, LinktreePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        linktrees::table
            .order((linktrees::created_at.asc(), linktrees::id.asc()))
            .select(LinktreeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_linktree)
            .collect()
    }

    async fn push_link(
        &self,
        id: &LinktreeId,
        link: &Link,
    ) -> Result<Linktree, LinktreePersistenceError> {
        let appended = json!([encode(link)?]);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = sql_query(PUSH_LINK_SQL)
            .bind::<SqlUuid, _>(*id.as_uuid())
            .bind::<Jsonb, _>(appended)
            .get_result::<LinktreeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        updated
            .map(row_to_linktree)
            .transpose()?
            .ok_or_else(|| LinktreePersistenceError::not_found(*id))
    }

    async fn replace_link_fields(
        &self,
        id: &LinktreeId,
        selector: &LinkMatch,
        fields: &LinkFields,
    ) -> Result<Linktree, LinktreePersistenceError> {
        let (key, value) = selector_parts(selector);
        let visits = i64::try_from(fields.visits()).map_err(|_| {
            LinktreePersistenceError::query("visit counter exceeds storable range")
        })?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = sql_query(REPLACE_LINK_SQL)
            .bind::<SqlUuid, _>(*id.as_uuid())
            .bind::<Text, _>(key)
            .bind::<Text, _>(value)
            .bind::<Text, _>(fields.name())
            .bind::<Text, _>(fields.url())
            .bind::<BigInt, _>(visits)
            .get_result::<LinktreeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match updated {
            Some(row) => row_to_linktree(row),
            None => Err(Self::explain_miss(&mut *conn, id).await),
        }
    }

    async fn remove_link(
        &self,
        id: &LinktreeId,
        link_id: &LinkId,
    ) -> Result<Linktree, LinktreePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = sql_query(REMOVE_LINK_SQL)
            .bind::<SqlUuid, _>(*id.as_uuid())
            .bind::<Text, _>(link_id.to_string())
            .get_result::<LinktreeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match updated {
            Some(row) => row_to_linktree(row),
            None => Err(Self::explain_miss(&mut *conn, id).await),
        }
    }

    async fn set_bio(
        &self,
        id: &LinktreeId,
        bio: &ProfileText,
    ) -> Result<Linktree, LinktreePersistenceError> {
        self.update_profile(id, ProfileColumn::Bio, bio).await
    }

    async fn set_fullname(
        &self,
        id: &LinktreeId,
        fullname: &ProfileText,
    ) -> Result<Linktree, LinktreePersistenceError> {
        self.update_profile(id, ProfileColumn::Fullname, fullname)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LinkDraft;
    use rstest::rstest;

    #[rstest]
    fn selector_prefers_id_key() {
        let id = LinkId::random();
        assert_eq!(selector_parts(&LinkMatch::Id(id)), ("id", id.to_string()));
        assert_eq!(
            selector_parts(&LinkMatch::Name("GitHub".to_owned())),
            ("name", "GitHub".to_owned())
        );
    }

    #[rstest]
    fn encoded_link_uses_wire_field_names() {
        let link = Link::from_draft(LinkDraft::new("GitHub", "https://github.com", 3).expect("draft"));
        let value = encode(&link).expect("encode");
        assert_eq!(value["id"], json!(link.id().to_string()));
        assert_eq!(value["link"], json!("https://github.com"));
        assert_eq!(value["visits"], json!(3));
    }

    #[rstest]
    fn rows_decode_into_trees() {
        let link = Link::from_draft(LinkDraft::new("GitHub", "https://github.com", 0).expect("draft"));
        let row = LinktreeRow {
            id: uuid::Uuid::new_v4(),
            fullname: "Ada".to_owned(),
            bio: String::new(),
            links: json!([encode(&link).expect("encode")]),
        };
        let tree = row_to_linktree(row).expect("decode");
        assert_eq!(tree.links(), &[link]);
    }

    #[rstest]
    fn corrupt_links_are_query_errors() {
        let row = LinktreeRow {
            id: uuid::Uuid::new_v4(),
            fullname: String::new(),
            bio: String::new(),
            links: json!({"not": "an array"}),
        };
        assert!(matches!(
            row_to_linktree(row),
            Err(LinktreePersistenceError::Query { .. })
        ));
    }
}
