//! Request extractors that report failures through [`ApiError`].

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::{ApiError, FieldError};

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Request bodies that can check their own field constraints.
pub trait Validate {
    fn validate(&self, v: &mut Validator);
}

/// JSON body that has already passed [`Validate`].
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        let mut v = Validator::default();
        value.validate(&mut v);
        v.finish()?;
        Ok(ValidJson(value))
    }
}

/// Collects field errors so a response reports all of them at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn chars(&mut self, field: &'static str, value: &str, min: usize, max: usize) {
        let n = value.trim().chars().count();
        if n < min {
            self.error(field, format!("must be at least {min} characters"));
        } else if n > max {
            self.error(field, format!("must be at most {max} characters"));
        }
    }

    pub fn opt_chars(&mut self, field: &'static str, value: Option<&str>, min: usize, max: usize) {
        if let Some(value) = value {
            self.chars(field, value, min, max);
        }
    }

    pub fn email(&mut self, field: &'static str, value: &str) {
        if !is_valid_email(value) {
            self.error(field, "invalid email address");
        } else if value.chars().count() > 100 {
            self.error(field, "must be at most 100 characters");
        }
    }

    pub fn opt_email(&mut self, field: &'static str, value: Option<&str>) {
        if let Some(value) = value {
            self.email(field, value);
        }
    }

    pub fn non_negative(&mut self, field: &'static str, value: Option<i32>) {
        if matches!(value, Some(n) if n < 0) {
            self.error(field, "must be greater than or equal to 0");
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default, alias = "skip")]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl Pagination {
    const MAX_LIMIT: i64 = 500;

    /// Clamped `(limit, offset)` for binding into a query.
    pub fn bounds(&self) -> (i64, i64) {
        (self.limit.clamp(0, Self::MAX_LIMIT), self.offset.max(0))
    }
}
