use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::extract::{Pagination, Validate, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    #[default]
    Negotiating,
    Closed,
    Lost,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SaleStatus::Negotiating => "negotiating",
            SaleStatus::Closed => "closed",
            SaleStatus::Lost => "lost",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

/// Body for creating a sale.
///
/// Unlike every other resource, the owner may be supplied by the caller;
/// it defaults to the authenticated user when omitted.
#[derive(Debug, Deserialize)]
pub struct CreateSale {
    pub title: String,
    pub value: Decimal,
    #[serde(default)]
    pub status: SaleStatus,
    #[serde(default, with = "super::iso_date::option")]
    pub closing_date: Option<Date>,
    pub notes: Option<String>,
    pub client_id: Uuid,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSale {
    pub title: Option<String>,
    pub value: Option<Decimal>,
    pub status: Option<SaleStatus>,
    #[serde(default, with = "super::iso_date::option")]
    pub closing_date: Option<Date>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaleFilter {
    pub status: Option<SaleStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default, alias = "skip")]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

impl SaleFilter {
    pub fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// 99_999_999.99, the largest NUMERIC(10, 2).
const MAX_VALUE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

fn check_value(v: &mut Validator, value: Decimal) {
    if value <= Decimal::ZERO {
        v.error("value", "must be greater than 0");
    } else if value.normalize().scale() > 2 {
        v.error("value", "must have at most 2 decimal places");
    } else if value > MAX_VALUE {
        v.error("value", "is too large");
    }
}

impl Validate for CreateSale {
    fn validate(&self, v: &mut Validator) {
        v.chars("title", &self.title, 5, 200);
        check_value(v, self.value);
    }
}

impl Validate for UpdateSale {
    fn validate(&self, v: &mut Validator) {
        v.opt_chars("title", self.title.as_deref(), 5, 200);
        if let Some(value) = self.value {
            check_value(v, value);
        }
    }
}
