use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult},
        usecases::accounts::AccountResolver,
    },
    domain::{
        repositories::{rooms::RoomRepository, users::UserRepository},
        value_objects::rooms::{CreateRoomModel, RoomDto},
    },
};

pub struct RoomCatalogUseCase<U, R>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    accounts: Arc<AccountResolver<U>>,
    room_repo: Arc<R>,
}

impl<U, R> RoomCatalogUseCase<U, R>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    pub fn new(accounts: Arc<AccountResolver<U>>, room_repo: Arc<R>) -> Self {
        Self {
            accounts,
            room_repo,
        }
    }

    pub async fn create_room(
        &self,
        external_id: &str,
        email: Option<String>,
        model: CreateRoomModel,
    ) -> UseCaseResult<RoomDto> {
        let creator_id = self.accounts.resolve(external_id, email).await?;

        let insert_room_entity = model.to_entity(creator_id).map_err(|message| {
            warn!(%creator_id, %message, "rooms: invalid create request");
            UseCaseError::Validation(message)
        })?;

        let room = self
            .room_repo
            .create(insert_room_entity)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "rooms: failed to create room");
                UseCaseError::Internal(err)
            })?;

        info!(room_id = %room.id, %creator_id, price = room.price, "rooms: room created");
        Ok(RoomDto::from(room))
    }

    pub async fn list_rooms(&self, external_id: &str) -> UseCaseResult<Vec<RoomDto>> {
        let Some(creator_id) = self.accounts.find(external_id).await? else {
            return Ok(Vec::new());
        };

        let rooms = self
            .room_repo
            .list_by_creator(creator_id)
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "rooms: failed to list rooms");
                UseCaseError::Internal(err)
            })?;

        Ok(rooms.into_iter().map(RoomDto::from).collect())
    }
}
