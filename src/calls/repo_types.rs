use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ownership::{Owned, OwnerPath};

/// Call log entry in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Call {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub sale_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    pub duration_secs: Option<i32>,
    pub result: Option<String>,
    pub transcript: Option<String>,
}

impl Owned for Call {
    const RESOURCE: &'static str = "Call";
    const TABLE: &'static str = "calls";
    const OWNER: OwnerPath = OwnerPath::Direct { column: "user_id" };
}
