use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use sqlx::PgPool;
use tracing::{error, warn};
use uuid::Uuid;

use super::{jwt::JwtKeys, repo_types::User};
use crate::{error::ApiError, state::AppState};

/// Subject of a valid bearer token. Does not touch the database.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// The user behind a valid bearer token, loaded from the database.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            warn!("missing or malformed Authorization header");
            return Err(ApiError::Unauthorized);
        };

        let keys = JwtKeys::from_ref(state);
        match keys.validate_now(token) {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(e) => {
                warn!(reason = %e, "bearer token rejected");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// Loads the user a token was issued for. A deleted user is indistinguishable
/// from a bad token.
pub async fn resolve(db: &PgPool, user_id: Uuid) -> Result<User, ApiError> {
    match User::find_by_id(db, user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            warn!(%user_id, "token subject no longer exists");
            Err(ApiError::Unauthorized)
        }
        Err(e) => {
            error!(error = %e, %user_id, "identity lookup failed");
            Err(ApiError::Internal(e.into()))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        resolve(&state.db, user_id).await.map(CurrentUser)
    }
}
