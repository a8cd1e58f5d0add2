use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::rooms::{InsertRoomEntity, RoomEntity};

pub const MAX_ROOM_NAME_CHARS: usize = 255;
pub const MAX_ROOM_PRICE: f64 = 999_999.99;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomModel {
    #[serde(alias = "name")]
    pub room_name: Option<String>,
    pub price: Option<f64>,
}

impl CreateRoomModel {
    pub fn to_entity(&self, creator_id: Uuid) -> Result<InsertRoomEntity, String> {
        let name = self
            .room_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if name.is_empty() {
            return Err("roomName is required".to_string());
        }
        if name.chars().count() > MAX_ROOM_NAME_CHARS {
            return Err(format!(
                "roomName must be at most {MAX_ROOM_NAME_CHARS} characters"
            ));
        }

        let price = self.price.ok_or_else(|| "price is required".to_string())?;
        if !price.is_finite() || price <= 0.0 {
            return Err("price must be greater than 0".to_string());
        }
        if price > MAX_ROOM_PRICE {
            return Err("price must be less than 1,000,000".to_string());
        }

        Ok(InsertRoomEntity {
            name: name.to_string(),
            price,
            creator_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoomEntity> for RoomDto {
    fn from(room: RoomEntity) -> Self {
        Self {
            id: room.id,
            name: room.name,
            price: room.price,
            creator_id: room.creator_id,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

/// Room summary shown before checkout.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoomSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
}

impl From<&RoomEntity> for RoomSummaryDto {
    fn from(room: &RoomEntity) -> Self {
        Self {
            id: room.id,
            name: room.name.clone(),
            price: room.price,
        }
    }
}
