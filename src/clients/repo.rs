use sqlx::PgPool;
use uuid::Uuid;

use super::{
    dto::{CreateClient, UpdateClient},
    repo_types::Client,
};
use crate::ownership::{contains_pattern, owner_predicate};

const COLUMNS: &str = "t.id, t.user_id, t.name, t.phone, t.email, t.company, t.notes, t.created_at";

/// Column a search can match on.
#[derive(Debug, Clone, Copy)]
pub enum SearchField {
    Name,
    Company,
}

impl SearchField {
    fn column(self) -> &'static str {
        match self {
            SearchField::Name => "t.name",
            SearchField::Company => "t.company",
        }
    }
}

impl Client {
    pub async fn list(
        db: &PgPool,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Client>> {
        sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM clients t
            WHERE {}
            ORDER BY t.name ASC, t.id ASC
            LIMIT $2 OFFSET $3
            "#,
            owner_predicate::<Client>(1)
        ))
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn search(
        db: &PgPool,
        owner: Uuid,
        field: SearchField,
        term: &str,
    ) -> sqlx::Result<Vec<Client>> {
        sqlx::query_as::<_, Client>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM clients t
            WHERE {} AND {} ILIKE $2
            ORDER BY t.name ASC, t.id ASC
            "#,
            owner_predicate::<Client>(1),
            field.column()
        ))
        .bind(owner)
        .bind(contains_pattern(term))
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<Option<Client>> {
        sqlx::query_as::<_, Client>(&format!(
            "SELECT {COLUMNS} FROM clients t WHERE t.id = $1 AND {}",
            owner_predicate::<Client>(2)
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(db)
        .await
    }

    /// A duplicate email under the same owner surfaces as the
    /// `clients_user_id_email_key` unique violation.
    pub async fn create(db: &PgPool, owner: Uuid, new: &CreateClient) -> sqlx::Result<Client> {
        sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients AS t (id, user_id, name, phone, email, company, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(new.name.trim())
        .bind(new.phone.as_deref().map(str::trim))
        .bind(new.email.as_deref())
        .bind(new.company.as_deref().map(str::trim))
        .bind(new.notes.as_deref().map(str::trim))
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        owner: Uuid,
        id: Uuid,
        changes: &UpdateClient,
    ) -> sqlx::Result<Option<Client>> {
        sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE clients AS t SET
                name    = COALESCE($3, t.name),
                phone   = COALESCE($4, t.phone),
                email   = COALESCE($5, t.email),
                company = COALESCE($6, t.company),
                notes   = COALESCE($7, t.notes)
            WHERE t.id = $1 AND {}
            RETURNING {COLUMNS}
            "#,
            owner_predicate::<Client>(2)
        ))
        .bind(id)
        .bind(owner)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(changes.phone.as_deref().map(str::trim))
        .bind(changes.email.as_deref())
        .bind(changes.company.as_deref().map(str::trim))
        .bind(changes.notes.as_deref().map(str::trim))
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM clients AS t WHERE t.id = $1 AND {}",
            owner_predicate::<Client>(2)
        ))
        .bind(id)
        .bind(owner)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
