use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::rooms::{InsertRoomEntity, RoomEntity};

#[automock]
#[async_trait]
pub trait RoomRepository {
    async fn create(&self, insert_room_entity: InsertRoomEntity) -> Result<RoomEntity>;
    async fn find_by_id(&self, room_id: Uuid) -> Result<Option<RoomEntity>>;
    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<RoomEntity>>;
}
