use serde::Deserialize;

use crate::extract::{Validate, Validator};

/// Body for creating a client. The owner always comes from the token.
#[derive(Debug, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; omitted fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

fn check_optional(
    v: &mut Validator,
    phone: Option<&str>,
    email: Option<&str>,
    company: Option<&str>,
    notes: Option<&str>,
) {
    v.opt_chars("phone", phone, 0, 15);
    v.opt_email("email", email);
    v.opt_chars("company", company, 0, 100);
    v.opt_chars("notes", notes, 0, 100);
}

impl Validate for CreateClient {
    fn validate(&self, v: &mut Validator) {
        v.chars("name", &self.name, 3, 100);
        check_optional(
            v,
            self.phone.as_deref(),
            self.email.as_deref(),
            self.company.as_deref(),
            self.notes.as_deref(),
        );
    }
}

impl Validate for UpdateClient {
    fn validate(&self, v: &mut Validator) {
        v.opt_chars("name", self.name.as_deref(), 3, 100);
        check_optional(
            v,
            self.phone.as_deref(),
            self.email.as_deref(),
            self.company.as_deref(),
            self.notes.as_deref(),
        );
    }
}
