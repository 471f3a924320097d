//! Per-user row ownership.
//!
//! Every owned resource declares once how its rows reach a user: either a
//! column holding the user id, or a foreign key to a parent row that holds
//! it. Repositories splice [`owner_predicate`] into each statement so the
//! id lookup and the ownership check happen in the same query, and a row
//! owned by someone else behaves exactly like a missing one.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Alias every repository gives the resource's own table.
pub const ALIAS: &str = "t";

#[derive(Debug, Clone, Copy)]
pub enum OwnerPath {
    /// `column` on the row itself is the owning user's id.
    Direct { column: &'static str },
    /// `fk` points at `parent_table.id`; the parent's `parent_owner` column
    /// is the owning user's id.
    ViaParent {
        fk: &'static str,
        parent_table: &'static str,
        parent_owner: &'static str,
    },
}

pub trait Owned {
    /// Name used in "not found" responses.
    const RESOURCE: &'static str;
    const TABLE: &'static str;
    const OWNER: OwnerPath;
}

/// SQL condition limiting rows of `R` (aliased [`ALIAS`]) to the user bound
/// at placeholder `$param`.
pub fn owner_predicate<R: Owned>(param: usize) -> String {
    match R::OWNER {
        OwnerPath::Direct { column } => format!("{ALIAS}.{column} = ${param}"),
        OwnerPath::ViaParent {
            fk,
            parent_table,
            parent_owner,
        } => format!(
            "EXISTS (SELECT 1 FROM {parent_table} p WHERE p.id = {ALIAS}.{fk} AND p.{parent_owner} = ${param})"
        ),
    }
}

/// The user that owns row `id` of `R`, following the owner path.
pub async fn owner_of<R: Owned>(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Uuid>> {
    let sql = match R::OWNER {
        OwnerPath::Direct { column } => {
            format!("SELECT {ALIAS}.{column} FROM {} {ALIAS} WHERE {ALIAS}.id = $1", R::TABLE)
        }
        OwnerPath::ViaParent {
            fk,
            parent_table,
            parent_owner,
        } => format!(
            "SELECT p.{parent_owner} FROM {} {ALIAS} JOIN {parent_table} p ON p.id = {ALIAS}.{fk} WHERE {ALIAS}.id = $1",
            R::TABLE
        ),
    };
    sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Fails with `NotFound` unless row `id` of `R` exists and belongs to `owner`.
/// Used to vet ids the client references (a call's client, a suggestion's call).
pub async fn ensure_owned<R: Owned>(db: &PgPool, owner: Uuid, id: Uuid) -> Result<(), ApiError> {
    match owner_of::<R>(db, id).await? {
        Some(found) if found == owner => Ok(()),
        _ => Err(ApiError::not_found(R::RESOURCE)),
    }
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
pub fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
