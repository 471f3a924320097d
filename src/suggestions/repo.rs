use sqlx::PgPool;
use uuid::Uuid;

use super::{dto::CreateSuggestion, repo_types::Suggestion};
use crate::ownership::owner_predicate;

const COLUMNS: &str = "t.id, t.call_id, t.content, t.moment, t.accepted, t.created_at";

impl Suggestion {
    pub async fn list(
        db: &PgPool,
        owner: Uuid,
        accepted: Option<bool>,
        call_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Suggestion>> {
        sqlx::query_as::<_, Suggestion>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM suggestions t
            WHERE {}
              AND ($2::bool IS NULL OR t.accepted = $2)
              AND ($3::uuid IS NULL OR t.call_id = $3)
            ORDER BY t.created_at ASC, t.id ASC
            LIMIT $4 OFFSET $5
            "#,
            owner_predicate::<Suggestion>(1)
        ))
        .bind(owner)
        .bind(accepted)
        .bind(call_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<Option<Suggestion>> {
        sqlx::query_as::<_, Suggestion>(&format!(
            "SELECT {COLUMNS} FROM suggestions t WHERE t.id = $1 AND {}",
            owner_predicate::<Suggestion>(2)
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(db)
        .await
    }

    /// The caller must already have checked that the parent call is theirs.
    pub async fn create(db: &PgPool, new: &CreateSuggestion) -> sqlx::Result<Suggestion> {
        sqlx::query_as::<_, Suggestion>(&format!(
            r#"
            INSERT INTO suggestions AS t (id, call_id, content, moment, accepted)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.call_id)
        .bind(new.content.trim())
        .bind(new.moment)
        .bind(new.accepted)
        .fetch_one(db)
        .await
    }

    /// `None` leaves the flag as is, so an empty update just reads the row back.
    pub async fn set_accepted(
        db: &PgPool,
        owner: Uuid,
        id: Uuid,
        accepted: Option<bool>,
    ) -> sqlx::Result<Option<Suggestion>> {
        sqlx::query_as::<_, Suggestion>(&format!(
            r#"
            UPDATE suggestions AS t SET accepted = COALESCE($3, t.accepted)
            WHERE t.id = $1 AND {}
            RETURNING {COLUMNS}
            "#,
            owner_predicate::<Suggestion>(2)
        ))
        .bind(id)
        .bind(owner)
        .bind(accepted)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM suggestions AS t WHERE t.id = $1 AND {}",
            owner_predicate::<Suggestion>(2)
        ))
        .bind(id)
        .bind(owner)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
