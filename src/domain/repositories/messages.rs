use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::messages::{
    DirectMessageEntity, InsertDirectMessageEntity, InsertRoomMessageEntity, RoomMessageEntity,
};

#[automock]
#[async_trait]
pub trait MessageRepository {
    async fn insert_room_message(
        &self,
        insert_room_message_entity: InsertRoomMessageEntity,
    ) -> Result<RoomMessageEntity>;
    /// Oldest first.
    async fn list_room_messages(&self, room_id: Uuid) -> Result<Vec<RoomMessageEntity>>;
    async fn insert_direct_message(
        &self,
        insert_direct_message_entity: InsertDirectMessageEntity,
    ) -> Result<DirectMessageEntity>;
    /// Both directions between the two users in `room_id`, oldest first.
    async fn list_direct_messages(
        &self,
        room_id: Uuid,
        user_id: Uuid,
        peer_id: Uuid,
    ) -> Result<Vec<DirectMessageEntity>>;
}
