use std::sync::Arc;

use tracing::{error, info};

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult, parse_id},
        usecases::{accounts::AccountResolver, authorization::RoomAuthorizer},
    },
    domain::{
        entities::messages::{InsertDirectMessageEntity, InsertRoomMessageEntity},
        repositories::{messages::MessageRepository, rooms::RoomRepository, users::UserRepository},
        value_objects::messages::{DirectMessageDto, RoomMessageDto, SendMessageModel},
    },
};

pub struct ChatUseCase<U, R, M>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    M: MessageRepository + Send + Sync + 'static,
{
    accounts: Arc<AccountResolver<U>>,
    rooms: RoomAuthorizer<R>,
    message_repo: Arc<M>,
}

impl<U, R, M> ChatUseCase<U, R, M>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    M: MessageRepository + Send + Sync + 'static,
{
    pub fn new(accounts: Arc<AccountResolver<U>>, room_repo: Arc<R>, message_repo: Arc<M>) -> Self {
        Self {
            accounts,
            rooms: RoomAuthorizer::new(room_repo),
            message_repo,
        }
    }

    pub async fn list_room_messages(&self, room_id: &str) -> UseCaseResult<Vec<RoomMessageDto>> {
        let room_id = parse_id(Some(room_id), "roomId")?;

        let messages = self
            .message_repo
            .list_room_messages(room_id)
            .await
            .map_err(|err| {
                error!(%room_id, db_error = ?err, "chat: failed to load room messages");
                UseCaseError::Internal(err)
            })?;

        Ok(messages.into_iter().map(RoomMessageDto::from).collect())
    }

    pub async fn post_room_message(
        &self,
        external_id: &str,
        email: Option<String>,
        room_id: &str,
        model: SendMessageModel,
    ) -> UseCaseResult<RoomMessageDto> {
        let room_id = parse_id(Some(room_id), "roomId")?;
        let content = model
            .validated_content()
            .map_err(UseCaseError::Validation)?;

        self.rooms.find_room(room_id).await?;
        let user_id = self.accounts.resolve(external_id, email).await?;

        let message = self
            .message_repo
            .insert_room_message(InsertRoomMessageEntity {
                room_id,
                user_id,
                content,
            })
            .await
            .map_err(|err| {
                error!(%room_id, %user_id, db_error = ?err, "chat: failed to store room message");
                UseCaseError::Internal(err)
            })?;

        info!(%room_id, %user_id, message_id = %message.id, "chat: room message posted");
        Ok(RoomMessageDto::from(message))
    }

    pub async fn list_direct_messages(
        &self,
        external_id: &str,
        room_id: &str,
        peer_id: &str,
    ) -> UseCaseResult<Vec<DirectMessageDto>> {
        let room_id = parse_id(Some(room_id), "roomId")?;
        let peer_id = parse_id(Some(peer_id), "peerId")?;

        let Some(user_id) = self.accounts.find(external_id).await? else {
            return Ok(Vec::new());
        };

        let messages = self
            .message_repo
            .list_direct_messages(room_id, user_id, peer_id)
            .await
            .map_err(|err| {
                error!(%room_id, %user_id, %peer_id, db_error = ?err, "chat: failed to load direct messages");
                UseCaseError::Internal(err)
            })?;

        Ok(messages.into_iter().map(DirectMessageDto::from).collect())
    }

    pub async fn send_direct_message(
        &self,
        external_id: &str,
        email: Option<String>,
        room_id: &str,
        peer_id: &str,
        model: SendMessageModel,
    ) -> UseCaseResult<DirectMessageDto> {
        let room_id = parse_id(Some(room_id), "roomId")?;
        let peer_id = parse_id(Some(peer_id), "peerId")?;
        let content = model
            .validated_content()
            .map_err(UseCaseError::Validation)?;

        self.rooms.find_room(room_id).await?;
        let sender_id = self.accounts.resolve(external_id, email).await?;
        if sender_id == peer_id {
            return Err(UseCaseError::Validation(
                "cannot send a direct message to yourself".to_string(),
            ));
        }
        if !self.accounts.exists(peer_id).await? {
            return Err(UseCaseError::NotFound("peer"));
        }

        let message = self
            .message_repo
            .insert_direct_message(InsertDirectMessageEntity {
                room_id,
                sender_id,
                receiver_id: peer_id,
                content,
            })
            .await
            .map_err(|err| {
                error!(%room_id, %sender_id, %peer_id, db_error = ?err, "chat: failed to store direct message");
                UseCaseError::Internal(err)
            })?;

        info!(%room_id, %sender_id, %peer_id, "chat: direct message sent");
        Ok(DirectMessageDto::from(message))
    }
}
