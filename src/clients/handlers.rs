use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateClient, UpdateClient},
    repo::SearchField,
    repo_types::Client,
};
use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    extract::{ApiPath, ApiQuery, Pagination, ValidJson},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/clients/search/name/:term", get(search_by_name))
        .route("/clients/search/company/:term", get(search_by_company))
}

fn not_found() -> ApiError {
    ApiError::not_found("Client")
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_client(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<CreateClient>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = Client::create(&state.db, user.id, &payload).await?;
    info!(client_id = %client.id, "client created");
    Ok((StatusCode::CREATED, Json(client)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_clients(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(p): ApiQuery<Pagination>,
) -> ApiResult<Json<Vec<Client>>> {
    let (limit, offset) = p.bounds();
    Ok(Json(Client::list(&state.db, user.id, limit, offset).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_client(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Client>> {
    Client::get(&state.db, user.id, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_client(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(payload): ValidJson<UpdateClient>,
) -> ApiResult<Json<Client>> {
    Client::update(&state.db, user.id, id, &payload)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_client(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !Client::delete(&state.db, user.id, id).await? {
        return Err(not_found());
    }
    info!(client_id = %id, "client deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn search_by_name(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(term): ApiPath<String>,
) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(
        Client::search(&state.db, user.id, SearchField::Name, &term).await?,
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn search_by_company(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(term): ApiPath<String>,
) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(
        Client::search(&state.db, user.id, SearchField::Company, &term).await?,
    ))
}
