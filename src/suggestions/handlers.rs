use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateSuggestion, SuggestionFilter, UpdateSuggestion},
    repo_types::Suggestion,
};
use crate::{
    auth::CurrentUser,
    calls::repo_types::Call,
    error::{ApiError, ApiResult},
    extract::{ApiPath, ApiQuery, ValidJson},
    ownership::ensure_owned,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suggestions", get(list_suggestions).post(create_suggestion))
        .route(
            "/suggestions/:id",
            get(get_suggestion)
                .put(update_suggestion)
                .delete(delete_suggestion),
        )
        .route("/suggestions/:id/accept", patch(accept_suggestion))
}

fn not_found() -> ApiError {
    ApiError::not_found("Suggestion")
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_suggestion(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<CreateSuggestion>,
) -> ApiResult<(StatusCode, Json<Suggestion>)> {
    ensure_owned::<Call>(&state.db, user.id, payload.call_id).await?;

    let suggestion = Suggestion::create(&state.db, &payload).await?;
    info!(suggestion_id = %suggestion.id, call_id = %suggestion.call_id, "suggestion created");
    Ok((StatusCode::CREATED, Json(suggestion)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_suggestions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(filter): ApiQuery<SuggestionFilter>,
) -> ApiResult<Json<Vec<Suggestion>>> {
    let (limit, offset) = filter.page().bounds();
    let suggestions = Suggestion::list(
        &state.db,
        user.id,
        filter.accepted,
        filter.call_id,
        limit,
        offset,
    )
    .await?;
    Ok(Json(suggestions))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_suggestion(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Suggestion>> {
    Suggestion::get(&state.db, user.id, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_suggestion(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateSuggestion>,
) -> ApiResult<Json<Suggestion>> {
    Suggestion::set_accepted(&state.db, user.id, id, payload.accepted)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn accept_suggestion(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Suggestion>> {
    Suggestion::set_accepted(&state.db, user.id, id, Some(true))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_suggestion(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !Suggestion::delete(&state.db, user.id, id).await? {
        return Err(not_found());
    }
    info!(suggestion_id = %id, "suggestion deleted");
    Ok(StatusCode::NO_CONTENT)
}
