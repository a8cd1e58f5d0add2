use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::postgres::schema::rooms;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = rooms)]
pub struct RoomEntity {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rooms)]
pub struct InsertRoomEntity {
    pub name: String,
    pub price: f64,
    pub creator_id: Uuid,
}
