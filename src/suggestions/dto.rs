use serde::Deserialize;
use uuid::Uuid;

use crate::extract::{Pagination, Validate, Validator};

#[derive(Debug, Deserialize)]
pub struct CreateSuggestion {
    pub content: String,
    pub moment: Option<i32>,
    #[serde(default)]
    pub accepted: bool,
    pub call_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSuggestion {
    pub accepted: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionFilter {
    pub accepted: Option<bool>,
    pub call_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default, alias = "skip")]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

impl SuggestionFilter {
    pub fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl Validate for CreateSuggestion {
    fn validate(&self, v: &mut Validator) {
        v.chars("content", &self.content, 10, usize::MAX);
        v.non_negative("moment", self.moment);
    }
}

impl Validate for UpdateSuggestion {
    fn validate(&self, _v: &mut Validator) {}
}
