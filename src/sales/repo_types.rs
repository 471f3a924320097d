use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::ownership::{Owned, OwnerPath};

/// Sale opportunity in the database. `status` is a free-form tag; any
/// transition between the known values is allowed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub value: Decimal,
    pub status: String,
    #[serde(with = "super::iso_date::option")]
    pub closing_date: Option<Date>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Owned for Sale {
    const RESOURCE: &'static str = "Sale";
    const TABLE: &'static str = "sales";
    const OWNER: OwnerPath = OwnerPath::Direct { column: "user_id" };
}
