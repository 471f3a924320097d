use serde::Deserialize;

use crate::extract::{Validate, Validator};

#[derive(Debug, Deserialize)]
pub struct CreateChatMessage {
    pub content: String,
}

impl Validate for CreateChatMessage {
    fn validate(&self, v: &mut Validator) {
        v.chars("content", &self.content, 1, usize::MAX);
    }
}
