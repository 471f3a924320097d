use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::CreateChatMessage, repo_types::ChatMessage};
use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    extract::{ApiPath, ApiQuery, Pagination, ValidJson},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/chat",
            get(list_messages).post(send_message).delete(clear_history),
        )
        .route("/chat/:id", get(get_message).delete(delete_message))
}

fn not_found() -> ApiError {
    ApiError::not_found("Chat message")
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<CreateChatMessage>,
) -> ApiResult<(StatusCode, Json<ChatMessage>)> {
    let message = ChatMessage::create(&state.db, user.id, &payload.content).await?;
    info!(message_id = %message.id, "chat message stored");
    Ok((StatusCode::CREATED, Json(message)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(p): ApiQuery<Pagination>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    let (limit, offset) = p.bounds();
    Ok(Json(
        ChatMessage::list(&state.db, user.id, limit, offset).await?,
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ChatMessage>> {
    ChatMessage::get(&state.db, user.id, id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    if !ChatMessage::delete(&state.db, user.id, id).await? {
        return Err(not_found());
    }
    info!(message_id = %id, "chat message deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn clear_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<StatusCode> {
    let removed = ChatMessage::clear(&state.db, user.id).await?;
    info!(removed, "chat history cleared");
    Ok(StatusCode::NO_CONTENT)
}
