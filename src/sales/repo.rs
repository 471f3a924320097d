use sqlx::PgPool;
use uuid::Uuid;

use super::{
    dto::{CreateSale, SaleStatus, UpdateSale},
    repo_types::Sale,
};
use crate::ownership::owner_predicate;

const COLUMNS: &str = "t.id, t.user_id, t.client_id, t.title, t.value, t.status, \
                       t.closing_date, t.notes, t.created_at, t.updated_at";

impl Sale {
    pub async fn list(
        db: &PgPool,
        owner: Uuid,
        status: Option<SaleStatus>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Sale>> {
        sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM sales t
            WHERE {} AND ($2::text IS NULL OR t.status = $2)
            ORDER BY t.created_at DESC, t.id ASC
            LIMIT $3 OFFSET $4
            "#,
            owner_predicate::<Sale>(1)
        ))
        .bind(owner)
        .bind(status.map(SaleStatus::as_str))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<Option<Sale>> {
        sqlx::query_as::<_, Sale>(&format!(
            "SELECT {COLUMNS} FROM sales t WHERE t.id = $1 AND {}",
            owner_predicate::<Sale>(2)
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(db)
        .await
    }

    /// `owner` is whoever the sale is recorded under, which the caller may
    /// have chosen; see [`CreateSale`].
    pub async fn create(db: &PgPool, owner: Uuid, new: &CreateSale) -> sqlx::Result<Sale> {
        sqlx::query_as::<_, Sale>(&format!(
            r#"
            INSERT INTO sales AS t (id, user_id, client_id, title, value, status, closing_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(new.client_id)
        .bind(new.title.trim())
        .bind(new.value)
        .bind(new.status.as_str())
        .bind(new.closing_date)
        .bind(new.notes.as_deref())
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        owner: Uuid,
        id: Uuid,
        changes: &UpdateSale,
    ) -> sqlx::Result<Option<Sale>> {
        sqlx::query_as::<_, Sale>(&format!(
            r#"
            UPDATE sales AS t SET
                title        = COALESCE($3, t.title),
                value        = COALESCE($4, t.value),
                status       = COALESCE($5, t.status),
                closing_date = COALESCE($6, t.closing_date),
                notes        = COALESCE($7, t.notes),
                updated_at   = now()
            WHERE t.id = $1 AND {}
            RETURNING {COLUMNS}
            "#,
            owner_predicate::<Sale>(2)
        ))
        .bind(id)
        .bind(owner)
        .bind(changes.title.as_deref().map(str::trim))
        .bind(changes.value)
        .bind(changes.status.map(SaleStatus::as_str))
        .bind(changes.closing_date)
        .bind(changes.notes.as_deref())
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM sales AS t WHERE t.id = $1 AND {}",
            owner_predicate::<Sale>(2)
        ))
        .bind(id)
        .bind(owner)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
