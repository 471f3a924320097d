use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    dto::{CallResult, CreateCall, UpdateCall},
    repo_types::Call,
};
use crate::ownership::owner_predicate;

const COLUMNS: &str =
    "t.id, t.user_id, t.client_id, t.sale_id, t.started_at, t.duration_secs, t.result, t.transcript";

impl Call {
    /// Newest first.
    pub async fn list(
        db: &PgPool,
        owner: Uuid,
        result: Option<CallResult>,
        client_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Call>> {
        sqlx::query_as::<_, Call>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM calls t
            WHERE {}
              AND ($2::text IS NULL OR t.result = $2)
              AND ($3::uuid IS NULL OR t.client_id = $3)
            ORDER BY t.started_at DESC, t.id ASC
            LIMIT $4 OFFSET $5
            "#,
            owner_predicate::<Call>(1)
        ))
        .bind(owner)
        .bind(result.map(CallResult::as_str))
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<Option<Call>> {
        sqlx::query_as::<_, Call>(&format!(
            "SELECT {COLUMNS} FROM calls t WHERE t.id = $1 AND {}",
            owner_predicate::<Call>(2)
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(db)
        .await
    }

    pub async fn create(db: &PgPool, owner: Uuid, new: &CreateCall) -> sqlx::Result<Call> {
        sqlx::query_as::<_, Call>(&format!(
            r#"
            INSERT INTO calls AS t (id, user_id, client_id, sale_id, started_at, duration_secs, result, transcript)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(new.client_id)
        .bind(new.sale_id)
        .bind(new.started_at.unwrap_or_else(OffsetDateTime::now_utc))
        .bind(new.duration_secs)
        .bind(new.result.map(CallResult::as_str))
        .bind(new.transcript.as_deref())
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        owner: Uuid,
        id: Uuid,
        changes: &UpdateCall,
    ) -> sqlx::Result<Option<Call>> {
        sqlx::query_as::<_, Call>(&format!(
            r#"
            UPDATE calls AS t SET
                duration_secs = COALESCE($3, t.duration_secs),
                result        = COALESCE($4, t.result),
                transcript    = COALESCE($5, t.transcript),
                sale_id       = COALESCE($6, t.sale_id)
            WHERE t.id = $1 AND {}
            RETURNING {COLUMNS}
            "#,
            owner_predicate::<Call>(2)
        ))
        .bind(id)
        .bind(owner)
        .bind(changes.duration_secs)
        .bind(changes.result.map(CallResult::as_str))
        .bind(changes.transcript.as_deref())
        .bind(changes.sale_id)
        .fetch_optional(db)
        .await
    }

    /// Suggestions on the call go with it.
    pub async fn delete(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM calls AS t WHERE t.id = $1 AND {}",
            owner_predicate::<Call>(2)
        ))
        .bind(id)
        .bind(owner)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
