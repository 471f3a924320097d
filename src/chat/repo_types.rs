use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ownership::{Owned, OwnerPath};

/// One message in a user's assistant chat history.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
}

impl Owned for ChatMessage {
    const RESOURCE: &'static str = "Chat message";
    const TABLE: &'static str = "chat_messages";
    const OWNER: OwnerPath = OwnerPath::Direct { column: "user_id" };
}
