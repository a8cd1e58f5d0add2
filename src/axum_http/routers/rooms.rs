use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tracing::info;

use crate::{
    application::usecases::{accounts::AccountResolver, rooms::RoomCatalogUseCase},
    axum_http::{
        auth::SessionUser,
        error_responses::{AppError, json_body},
    },
    domain::{
        repositories::{rooms::RoomRepository, users::UserRepository},
        value_objects::rooms::CreateRoomModel,
    },
    infra::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{rooms::RoomPostgres, users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let room_repository = RoomPostgres::new(Arc::clone(&db_pool));

    let usecase = RoomCatalogUseCase::new(
        Arc::new(AccountResolver::new(Arc::new(user_repository))),
        Arc::new(room_repository),
    );

    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .with_state(Arc::new(usecase))
}

pub async fn create_room<U, R>(
    State(usecase): State<Arc<RoomCatalogUseCase<U, R>>>,
    user: SessionUser,
    payload: Result<Json<CreateRoomModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    let model = json_body(payload)?;
    info!(external_id = %user.external_id, "rooms: create request received");

    let room = usecase
        .create_room(&user.external_id, user.email, model)
        .await?;

    Ok((StatusCode::CREATED, Json(room)))
}

pub async fn list_rooms<U, R>(
    State(usecase): State<Arc<RoomCatalogUseCase<U, R>>>,
    user: SessionUser,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    let rooms = usecase.list_rooms(&user.external_id).await?;
    Ok(Json(json!({ "rooms": rooms })))
}
