use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateSale, SaleFilter, UpdateSale},
    repo_types::Sale,
};
use crate::{
    auth::CurrentUser,
    clients::repo_types::Client,
    error::{ApiError, ApiResult},
    extract::{ApiPath, ApiQuery, ValidJson},
    ownership::ensure_owned,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route(
            "/sales/:id",
            get(get_sale).put(update_sale).delete(delete_sale),
        )
}

fn not_found() -> ApiError {
    ApiError::not_found("Sale")
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_sale(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<CreateSale>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    ensure_owned::<Client>(&state.db, user.id, payload.client_id).await?;

    let owner = payload.user_id.unwrap_or(user.id);
    if owner != user.id {
        warn!(owner = %owner, "sale created on behalf of another user");
    }

    let sale = Sale::create(&state.db, owner, &payload).await?;
    info!(sale_id = %sale.id, "sale created");
    Ok((StatusCode::CREATED, Json(sale)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_sales(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(filter): ApiQuery<SaleFilter>,
) -> ApiResult<Json<Vec<Sale>>> {
    let (limit, offset) = filter.page().bounds();
    Ok(Json(
        Sale::list(&state.db, user.id, filter.status, limit, offset).await?,
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_sale(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Sale>> {
    Sale::get(&state.db, user.id, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_sale(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateSale>,
) -> ApiResult<Json<Sale>> {
    Sale::update(&state.db, user.id, id, &payload)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_sale(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !Sale::delete(&state.db, user.id, id).await? {
        return Err(not_found());
    }
    info!(sale_id = %id, "sale deleted");
    Ok(StatusCode::NO_CONTENT)
}
