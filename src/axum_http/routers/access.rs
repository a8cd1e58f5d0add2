use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    application::{
        errors::UseCaseError,
        interfaces::media::MediaRoomService,
        usecases::{
            access_gate::AccessGateUseCase, accounts::AccountResolver,
            purchase_ledger::PurchaseLedgerUseCase,
        },
    },
    axum_http::{
        auth::SessionUser,
        error_responses::{AppError, json_body},
    },
    domain::{
        repositories::{
            purchases::PurchaseRepository, rooms::RoomRepository, users::UserRepository,
        },
        value_objects::{
            media::{CreateMediaRoomModel, MediaTokenModel},
            purchases::ValidatePasswordModel,
        },
    },
    infra::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{purchases::PurchasePostgres, rooms::RoomPostgres, users::UserPostgres},
    },
};

pub struct AccessState<U, R, P, M>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
    M: MediaRoomService + Send + Sync + 'static,
{
    pub accounts: Arc<AccountResolver<U>>,
    pub gate: AccessGateUseCase<U, R, P, M>,
}

/// Registers `/rooms/validate-password`, `/media/token` and `/media/rooms`.
pub fn routes<M>(db_pool: Arc<PgPoolSquad>, media: Arc<M>) -> Router
where
    M: MediaRoomService + Send + Sync + 'static,
{
    let accounts = Arc::new(AccountResolver::new(Arc::new(UserPostgres::new(
        Arc::clone(&db_pool),
    ))));
    let room_repository = Arc::new(RoomPostgres::new(Arc::clone(&db_pool)));
    let ledger = Arc::new(PurchaseLedgerUseCase::new(
        Arc::clone(&accounts),
        Arc::clone(&room_repository),
        Arc::new(PurchasePostgres::new(Arc::clone(&db_pool))),
    ));

    let state = AccessState {
        accounts,
        gate: AccessGateUseCase::new(ledger, room_repository, media),
    };

    Router::new()
        .route("/rooms/validate-password", post(validate_password))
        .route("/media/token", post(issue_media_token))
        .route("/media/rooms", post(create_media_room))
        .with_state(Arc::new(state))
}

pub async fn validate_password<U, R, P, M>(
    State(state): State<Arc<AccessState<U, R, P, M>>>,
    payload: Result<Json<ValidatePasswordModel>, JsonRejection>,
) -> Result<Response, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
    M: MediaRoomService + Send + Sync + 'static,
{
    let model = json_body(payload)?;

    match state.gate.validate_password(model).await {
        Ok(purchase_id) => {
            info!(%purchase_id, "access: password accepted");
            Ok(Json(json!({ "success": true })).into_response())
        }
        Err(UseCaseError::InvalidCredentials) => {
            warn!("access: password rejected");
            Ok((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "success": false,
                    "error": UseCaseError::InvalidCredentials.to_string(),
                })),
            )
                .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn issue_media_token<U, R, P, M>(
    State(state): State<Arc<AccessState<U, R, P, M>>>,
    payload: Result<Json<MediaTokenModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
    M: MediaRoomService + Send + Sync + 'static,
{
    let model = json_body(payload)?;
    let token = state.gate.issue_media_token(model).await?;
    Ok(Json(token))
}

pub async fn create_media_room<U, R, P, M>(
    State(state): State<Arc<AccessState<U, R, P, M>>>,
    user: SessionUser,
    payload: Result<Json<CreateMediaRoomModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
    M: MediaRoomService + Send + Sync + 'static,
{
    let model = json_body(payload)?;
    let creator_id = state
        .accounts
        .find(&user.external_id)
        .await?
        .ok_or(UseCaseError::NotFound("creator"))?;

    let room = state
        .gate
        .create_media_room(creator_id, &user.external_id, model.room_id.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(room)))
}
