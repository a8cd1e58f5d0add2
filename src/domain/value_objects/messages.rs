use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::messages::{DirectMessageEntity, RoomMessageEntity};

pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageModel {
    pub content: Option<String>,
}

impl SendMessageModel {
    /// Trimmed content, or a validation message.
    pub fn validated_content(&self) -> Result<String, String> {
        let content = self.content.as_deref().map(str::trim).unwrap_or_default();
        if content.is_empty() {
            return Err("content is required".to_string());
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(format!(
                "content must be at most {MAX_MESSAGE_CHARS} characters"
            ));
        }
        Ok(content.to_string())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessageDto {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<RoomMessageEntity> for RoomMessageDto {
    fn from(message: RoomMessageEntity) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id,
            user_id: message.user_id,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageDto {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<DirectMessageEntity> for DirectMessageDto {
    fn from(message: DirectMessageEntity) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            created_at: message.created_at,
        }
    }
}
