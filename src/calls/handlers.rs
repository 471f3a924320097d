use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CallFilter, CreateCall, UpdateCall},
    repo_types::Call,
};
use crate::{
    auth::CurrentUser,
    clients::repo_types::Client,
    error::{ApiError, ApiResult},
    extract::{ApiPath, ApiQuery, ValidJson},
    ownership::ensure_owned,
    sales::repo_types::Sale,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calls", get(list_calls).post(create_call))
        .route(
            "/calls/:id",
            get(get_call).put(update_call).delete(delete_call),
        )
}

fn not_found() -> ApiError {
    ApiError::not_found("Call")
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_call(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<CreateCall>,
) -> ApiResult<(StatusCode, Json<Call>)> {
    ensure_owned::<Client>(&state.db, user.id, payload.client_id).await?;
    if let Some(sale_id) = payload.sale_id {
        ensure_owned::<Sale>(&state.db, user.id, sale_id).await?;
    }

    let call = Call::create(&state.db, user.id, &payload).await?;
    info!(call_id = %call.id, "call logged");
    Ok((StatusCode::CREATED, Json(call)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_calls(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(filter): ApiQuery<CallFilter>,
) -> ApiResult<Json<Vec<Call>>> {
    let (limit, offset) = filter.page().bounds();
    let calls = Call::list(
        &state.db,
        user.id,
        filter.result,
        filter.client_id,
        limit,
        offset,
    )
    .await?;
    Ok(Json(calls))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_call(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Call>> {
    Call::get(&state.db, user.id, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_call(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateCall>,
) -> ApiResult<Json<Call>> {
    if let Some(sale_id) = payload.sale_id {
        ensure_owned::<Sale>(&state.db, user.id, sale_id).await?;
    }
    Call::update(&state.db, user.id, id, &payload)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_call(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !Call::delete(&state.db, user.id, id).await? {
        return Err(not_found());
    }
    info!(call_id = %id, "call deleted");
    Ok(StatusCode::NO_CONTENT)
}
