use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{
    application::usecases::{accounts::AccountResolver, chat::ChatUseCase},
    axum_http::{
        auth::SessionUser,
        error_responses::{AppError, json_body},
    },
    domain::{
        repositories::{messages::MessageRepository, rooms::RoomRepository, users::UserRepository},
        value_objects::messages::SendMessageModel,
    },
    infra::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{messages::MessagePostgres, rooms::RoomPostgres, users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let usecase = ChatUseCase::new(
        Arc::new(AccountResolver::new(Arc::new(UserPostgres::new(
            Arc::clone(&db_pool),
        )))),
        Arc::new(RoomPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MessagePostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route(
            "/rooms/:room_id/messages",
            get(list_room_messages).post(post_room_message),
        )
        .route(
            "/rooms/:room_id/dm/:peer_id",
            get(list_direct_messages).post(send_direct_message),
        )
        .with_state(Arc::new(usecase))
}

pub async fn list_room_messages<U, R, M>(
    State(usecase): State<Arc<ChatUseCase<U, R, M>>>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    M: MessageRepository + Send + Sync + 'static,
{
    let messages = usecase.list_room_messages(&room_id).await?;
    Ok(Json(json!({ "messages": messages })))
}

pub async fn post_room_message<U, R, M>(
    State(usecase): State<Arc<ChatUseCase<U, R, M>>>,
    user: SessionUser,
    Path(room_id): Path<String>,
    payload: Result<Json<SendMessageModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    M: MessageRepository + Send + Sync + 'static,
{
    let model = json_body(payload)?;
    let message = usecase
        .post_room_message(&user.external_id, user.email, &room_id, model)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))))
}

pub async fn list_direct_messages<U, R, M>(
    State(usecase): State<Arc<ChatUseCase<U, R, M>>>,
    user: SessionUser,
    Path((room_id, peer_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    M: MessageRepository + Send + Sync + 'static,
{
    let messages = usecase
        .list_direct_messages(&user.external_id, &room_id, &peer_id)
        .await?;
    Ok(Json(json!({ "messages": messages })))
}

pub async fn send_direct_message<U, R, M>(
    State(usecase): State<Arc<ChatUseCase<U, R, M>>>,
    user: SessionUser,
    Path((room_id, peer_id)): Path<(String, String)>,
    payload: Result<Json<SendMessageModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    M: MessageRepository + Send + Sync + 'static,
{
    let model = json_body(payload)?;
    let message = usecase
        .send_direct_message(&user.external_id, user.email, &room_id, &peer_id, model)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))))
}
