use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::rooms::{InsertRoomEntity, RoomEntity},
        repositories::rooms::RoomRepository,
    },
    infra::postgres::{postgres_connection::PgPoolSquad, schema::rooms},
};

pub struct RoomPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RoomPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RoomRepository for RoomPostgres {
    async fn create(&self, insert_room_entity: InsertRoomEntity) -> Result<RoomEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(rooms::table)
            .values(&insert_room_entity)
            .returning(RoomEntity::as_returning())
            .get_result::<RoomEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, room_id: Uuid) -> Result<Option<RoomEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = rooms::table
            .find(room_id)
            .select(RoomEntity::as_select())
            .first::<RoomEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<RoomEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = rooms::table
            .filter(rooms::creator_id.eq(creator_id))
            .order(rooms::created_at.desc())
            .select(RoomEntity::as_select())
            .load::<RoomEntity>(&mut conn)?;

        Ok(results)
    }
}
