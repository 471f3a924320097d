use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ownership::{Owned, OwnerPath};

/// AI suggestion shown during a call. Has no owner column of its own; it
/// belongs to whoever owns the call.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Suggestion {
    pub id: Uuid,
    pub call_id: Uuid,
    pub content: String,
    pub moment: Option<i32>, // seconds into the call
    pub accepted: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Owned for Suggestion {
    const RESOURCE: &'static str = "Suggestion";
    const TABLE: &'static str = "suggestions";
    const OWNER: OwnerPath = OwnerPath::ViaParent {
        fk: "call_id",
        parent_table: "calls",
        parent_owner: "user_id",
    };
}
