use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::postgres::schema::{dm_messages, room_messages};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = room_messages)]
pub struct RoomMessageEntity {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = room_messages)]
pub struct InsertRoomMessageEntity {
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = dm_messages)]
pub struct DirectMessageEntity {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dm_messages)]
pub struct InsertDirectMessageEntity {
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
}
