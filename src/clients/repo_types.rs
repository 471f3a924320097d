use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ownership::{Owned, OwnerPath};

/// Client/lead record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Owned for Client {
    const RESOURCE: &'static str = "Client";
    const TABLE: &'static str = "clients";
    const OWNER: OwnerPath = OwnerPath::Direct { column: "user_id" };
}
