use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::ChatMessage;
use crate::ownership::owner_predicate;

const COLUMNS: &str = "t.id, t.user_id, t.content, t.sent_at";

impl ChatMessage {
    /// Newest first.
    pub async fn list(
        db: &PgPool,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<ChatMessage>> {
        sqlx::query_as::<_, ChatMessage>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM chat_messages t
            WHERE {}
            ORDER BY t.sent_at DESC, t.id ASC
            LIMIT $2 OFFSET $3
            "#,
            owner_predicate::<ChatMessage>(1)
        ))
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<Option<ChatMessage>> {
        sqlx::query_as::<_, ChatMessage>(&format!(
            "SELECT {COLUMNS} FROM chat_messages t WHERE t.id = $1 AND {}",
            owner_predicate::<ChatMessage>(2)
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(db)
        .await
    }

    pub async fn create(db: &PgPool, owner: Uuid, content: &str) -> sqlx::Result<ChatMessage> {
        sqlx::query_as::<_, ChatMessage>(&format!(
            r#"
            INSERT INTO chat_messages AS t (id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(content)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, owner: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query(&format!(
            "DELETE FROM chat_messages AS t WHERE t.id = $1 AND {}",
            owner_predicate::<ChatMessage>(2)
        ))
        .bind(id)
        .bind(owner)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes the owner's whole history; returns how many messages went.
    pub async fn clear(db: &PgPool, owner: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query(&format!(
            "DELETE FROM chat_messages AS t WHERE {}",
            owner_predicate::<ChatMessage>(1)
        ))
        .bind(owner)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
