use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::extract::{Pagination, Validate, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallResult {
    Success,
    Failure,
    InProgress,
}

impl CallResult {
    pub fn as_str(self) -> &'static str {
        match self {
            CallResult::Success => "success",
            CallResult::Failure => "failure",
            CallResult::InProgress => "in_progress",
        }
    }
}

/// Body for logging a call. The owner always comes from the token; any
/// `user_id` in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateCall {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    pub duration_secs: Option<i32>,
    pub result: Option<CallResult>,
    pub transcript: Option<String>,
    pub client_id: Uuid,
    pub sale_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCall {
    pub duration_secs: Option<i32>,
    pub result: Option<CallResult>,
    pub transcript: Option<String>,
    pub sale_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallFilter {
    pub result: Option<CallResult>,
    pub client_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default, alias = "skip")]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

impl CallFilter {
    pub fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl Validate for CreateCall {
    fn validate(&self, v: &mut Validator) {
        v.non_negative("duration_secs", self.duration_secs);
    }
}

impl Validate for UpdateCall {
    fn validate(&self, v: &mut Validator) {
        v.non_negative("duration_secs", self.duration_secs);
    }
}
