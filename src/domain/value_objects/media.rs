use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTokenModel {
    pub room_id: Option<String>,
    pub password: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MediaTokenDto {
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaRoomModel {
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaRoomDto {
    pub success: bool,
    pub room_id: Uuid,
    pub token: String,
}
