use std::sync::Arc;

use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    domain::{entities::rooms::RoomEntity, repositories::rooms::RoomRepository},
};

pub struct RoomAuthorizer<R>
where
    R: RoomRepository + Send + Sync + 'static,
{
    room_repo: Arc<R>,
}

impl<R> RoomAuthorizer<R>
where
    R: RoomRepository + Send + Sync + 'static,
{
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn find_room(&self, room_id: Uuid) -> UseCaseResult<RoomEntity> {
        self.room_repo
            .find_by_id(room_id)
            .await
            .map_err(|err| {
                error!(%room_id, db_error = ?err, "authorization: failed to load room");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("room"))
    }

    /// The single ownership check for creator-scoped operations.
    pub async fn assert_owns_room(&self, user_id: Uuid, room_id: Uuid) -> UseCaseResult<RoomEntity> {
        let room = self.find_room(room_id).await?;
        if room.creator_id != user_id {
            warn!(%user_id, %room_id, "authorization: caller does not own room");
            return Err(UseCaseError::Forbidden);
        }
        Ok(room)
    }
}
