use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::messages::{
            DirectMessageEntity, InsertDirectMessageEntity, InsertRoomMessageEntity,
            RoomMessageEntity,
        },
        repositories::messages::MessageRepository,
    },
    infra::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{dm_messages, room_messages},
    },
};

pub struct MessagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MessagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MessageRepository for MessagePostgres {
    async fn insert_room_message(
        &self,
        insert_room_message_entity: InsertRoomMessageEntity,
    ) -> Result<RoomMessageEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(room_messages::table)
            .values(&insert_room_message_entity)
            .returning(RoomMessageEntity::as_returning())
            .get_result::<RoomMessageEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_room_messages(&self, room_id: Uuid) -> Result<Vec<RoomMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = room_messages::table
            .filter(room_messages::room_id.eq(room_id))
            .order(room_messages::created_at.asc())
            .select(RoomMessageEntity::as_select())
            .load::<RoomMessageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn insert_direct_message(
        &self,
        insert_direct_message_entity: InsertDirectMessageEntity,
    ) -> Result<DirectMessageEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(dm_messages::table)
            .values(&insert_direct_message_entity)
            .returning(DirectMessageEntity::as_returning())
            .get_result::<DirectMessageEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_direct_messages(
        &self,
        room_id: Uuid,
        user_id: Uuid,
        peer_id: Uuid,
    ) -> Result<Vec<DirectMessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = dm_messages::table
            .filter(dm_messages::room_id.eq(room_id))
            .filter(
                dm_messages::sender_id
                    .eq(user_id)
                    .and(dm_messages::receiver_id.eq(peer_id))
                    .or(dm_messages::sender_id
                        .eq(peer_id)
                        .and(dm_messages::receiver_id.eq(user_id))),
            )
            .order(dm_messages::created_at.asc())
            .select(DirectMessageEntity::as_select())
            .load::<DirectMessageEntity>(&mut conn)?;

        Ok(results)
    }
}
