use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{jwt::IssuedToken, password::MAX_PASSWORD_BYTES, repo_types::User};
use crate::extract::{Validate, Validator};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self, v: &mut Validator) {
        v.chars("name", &self.name, 3, 100);
        v.email("email", self.email.trim());
        if self.password.chars().count() < 6 {
            v.error("password", "must be at least 6 characters");
        } else if self.password.len() > MAX_PASSWORD_BYTES {
            v.error("password", format!("must be at most {MAX_PASSWORD_BYTES} bytes"));
        }
        v.opt_chars("role", self.role.as_deref(), 1, 20);
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self, v: &mut Validator) {
        v.email("email", self.email.trim());
        if self.password.is_empty() {
            v.error("password", "must not be empty");
        }
    }
}

/// Response returned after register, login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub user: User,
}

impl AuthResponse {
    pub fn new(issued: IssuedToken, user: User) -> Self {
        Self {
            access_token: issued.token,
            token_type: "bearer",
            expires_at: issued.expires_at,
            user,
        }
    }
}
