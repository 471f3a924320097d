use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        extractors::CurrentUser,
        jwt::TokenError,
        password::PasswordError,
        repo_types::{NewUser, User},
    },
    error::{ApiError, ApiResult, FieldError},
    extract::ValidJson,
    state::AppState,
};

const DEFAULT_ROLE: &str = "seller";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
        .route("/auth/refresh", post(refresh))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user/dashboard", get(get_me))
}

fn token_failure(e: TokenError) -> ApiError {
    ApiError::Internal(anyhow::anyhow!(e))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let email = payload.email.trim();

    let hash = state.hasher.hash(&payload.password).map_err(|e| match e {
        PasswordError::TooLong => {
            ApiError::Validation(vec![FieldError::new("password", e.to_string())])
        }
        other => ApiError::Internal(other.into()),
    })?;

    // Uniqueness is left to the users_email_key constraint so concurrent
    // registrations cannot both succeed.
    let user = User::create(
        &state.db,
        NewUser {
            name: payload.name.trim(),
            email,
            password_hash: &hash,
            role: Some(payload.role.as_deref().unwrap_or(DEFAULT_ROLE)),
        },
    )
    .await
    .map_err(|e| {
        let err = ApiError::from(e);
        if matches!(err, ApiError::Conflict { .. }) {
            warn!(email, "email already registered");
        }
        err
    })?;

    let issued = state.keys.issue_now(user.id).map_err(token_failure)?;

    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(AuthResponse::new(issued, user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = payload.email.trim();

    let Some(user) = User::find_by_email(&state.db, email).await? else {
        state.hasher.verify_absent(&payload.password);
        warn!(email, "login unknown email");
        return Err(ApiError::Unauthorized);
    };

    if !state.hasher.verify(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized);
    }

    let user = User::touch_last_login(&state.db, user.id).await?;
    let issued = state.keys.issue_now(user.id).map_err(token_failure)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse::new(issued, user)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn refresh(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<AuthResponse>> {
    let issued = state.keys.issue_now(user.id).map_err(token_failure)?;
    Ok(Json(AuthResponse::new(issued, user)))
}

#[instrument(skip(user), fields(user_id = %user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
