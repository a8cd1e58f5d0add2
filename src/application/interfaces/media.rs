use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaServiceError {
    #[error("media room already exists")]
    RoomAlreadyExists,
    #[error("media service request failed: {0}")]
    Upstream(String),
}

#[automock]
#[async_trait]
pub trait MediaRoomService: Send + Sync {
    async fn create_room(&self, room_name: String) -> Result<(), MediaServiceError>;
    fn issue_join_token(&self, room_name: &str, identity: &str) -> anyhow::Result<String>;
}
