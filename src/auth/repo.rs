use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, last_login";

impl User {
    /// Find a user by email. Comparison is exact, as stored.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Insert a new user. A duplicate email surfaces as the `users_email_key`
    /// unique violation.
    pub async fn create(db: &PgPool, new: NewUser<'_>) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role)
        .fetch_one(db)
        .await
    }

    pub async fn touch_last_login(db: &PgPool, id: Uuid) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET last_login = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(db)
        .await
    }
}
