use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, invalid or expired credentials, or a token whose user is gone.
    #[error("unauthorized")]
    Unauthorized,
    /// Absent, or owned by someone else. Deliberately the same thing.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("conflict: {message}")]
    Conflict { message: String },
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldError]>,
}

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        ApiError::NotFound { resource }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Conflict { .. } => "conflict",
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Could not validate credentials".into(),
            ApiError::NotFound { resource } => format!("{resource} not found"),
            ApiError::Conflict { message } => message.clone(),
            ApiError::Validation(_) => "Request validation failed".into(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Internal(_) => "Internal server error".into(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("resource"),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::conflict(conflict_message(db_err.constraint()))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                ApiError::not_found("referenced resource")
            }
            _ => ApiError::Internal(anyhow::Error::from(err)),
        }
    }
}

/// Message for a unique violation, keyed on the constraint names in the migrations.
fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_key") => "Email already registered",
        Some("clients_user_id_email_key") => "A client with this email already exists",
        _ => "Resource already exists",
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                ApiError::Validation(vec![FieldError::new("body", e.body_text())])
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("query", rejection.body_text())])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("path", rejection.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(e) => tracing::error!(error = ?e, "internal error"),
            ApiError::Conflict { .. } => tracing::warn!(error = %self, "conflict"),
            ApiError::Unauthorized => tracing::info!("unauthorized request"),
            _ => tracing::debug!(error = %self, "client error"),
        }

        let status = self.status_code();
        let details = match &self {
            ApiError::Validation(fields) => Some(fields.as_slice()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.code(),
            message: self.user_message(),
            details,
        };
        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_sets_bearer_challenge() {
        let resp = ApiError::Unauthorized.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn not_found_has_no_challenge() {
        let resp = ApiError::not_found("Client").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(header::WWW_AUTHENTICATE).is_none());
        let json = body_json(resp).await;
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["message"], "Client not found");
    }

    #[tokio::test]
    async fn validation_lists_fields() {
        let resp = ApiError::Validation(vec![
            FieldError::new("name", "too short"),
            FieldError::new("email", "invalid email"),
        ])
        .into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert_eq!(json["details"][0]["field"], "name");
        assert_eq!(json["details"][1]["message"], "invalid email");
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let resp = ApiError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Internal server error");
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn conflict_messages_do_not_name_owners() {
        assert_eq!(conflict_message(Some("users_email_key")), "Email already registered");
        assert_eq!(
            conflict_message(Some("clients_user_id_email_key")),
            "A client with this email already exists"
        );
        assert_eq!(conflict_message(None), "Resource already exists");
    }
}
