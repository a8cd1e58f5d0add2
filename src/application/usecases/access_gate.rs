use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult, parse_id, require_text},
        interfaces::media::{MediaRoomService, MediaServiceError},
        usecases::{authorization::RoomAuthorizer, purchase_ledger::PurchaseLedgerUseCase},
    },
    domain::{
        repositories::{
            purchases::PurchaseRepository, rooms::RoomRepository, users::UserRepository,
        },
        value_objects::{
            media::{MediaRoomDto, MediaTokenDto, MediaTokenModel},
            purchases::ValidatePasswordModel,
        },
    },
};

/// Password gate in front of the media rooms.
pub struct AccessGateUseCase<U, R, P, M>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
    M: MediaRoomService + Send + Sync + 'static,
{
    ledger: Arc<PurchaseLedgerUseCase<U, R, P>>,
    authorizer: RoomAuthorizer<R>,
    media: Arc<M>,
}

impl<U, R, P, M> AccessGateUseCase<U, R, P, M>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
    M: MediaRoomService + Send + Sync + 'static,
{
    pub fn new(ledger: Arc<PurchaseLedgerUseCase<U, R, P>>, room_repo: Arc<R>, media: Arc<M>) -> Self {
        Self {
            ledger,
            authorizer: RoomAuthorizer::new(room_repo),
            media,
        }
    }

    pub async fn validate_password(&self, model: ValidatePasswordModel) -> UseCaseResult<Uuid> {
        let room_id = parse_id(model.room_id.as_deref(), "roomId")?;
        let password = require_text(model.password.as_deref(), "password")?;
        self.ledger.validate(room_id, &password).await
    }

    /// Validates the password again and hands out a media join credential.
    pub async fn issue_media_token(&self, model: MediaTokenModel) -> UseCaseResult<MediaTokenDto> {
        let room_id = parse_id(model.room_id.as_deref(), "roomId")?;
        let password = require_text(model.password.as_deref(), "password")?;
        let identity = require_text(model.user_id.as_deref(), "userId")?;

        self.ledger.validate(room_id, &password).await?;

        let room_name = room_id.to_string();
        self.ensure_media_room(&room_name).await?;
        let token = self.join_token(&room_name, &identity)?;

        info!(%room_id, identity = %identity, "access_gate: media token issued");
        Ok(MediaTokenDto { token })
    }

    /// Lets a creator open their own room without a password.
    pub async fn create_media_room(
        &self,
        creator_user_id: Uuid,
        identity: &str,
        room_id: Option<&str>,
    ) -> UseCaseResult<MediaRoomDto> {
        let room_id = parse_id(room_id, "roomId")?;
        self.authorizer
            .assert_owns_room(creator_user_id, room_id)
            .await?;

        let room_name = room_id.to_string();
        self.ensure_media_room(&room_name).await?;
        let token = self.join_token(&room_name, identity)?;

        info!(%room_id, %creator_user_id, "access_gate: creator media room ready");
        Ok(MediaRoomDto {
            success: true,
            room_id,
            token,
        })
    }

    async fn ensure_media_room(&self, room_name: &str) -> UseCaseResult<()> {
        match self.media.create_room(room_name.to_string()).await {
            Ok(()) => {
                info!(room_name, "access_gate: media room created");
                Ok(())
            }
            Err(MediaServiceError::RoomAlreadyExists) => Ok(()),
            Err(MediaServiceError::Upstream(message)) => {
                warn!(room_name, error = %message, "access_gate: media room creation failed");
                Err(UseCaseError::Upstream(
                    "Failed to create media room".to_string(),
                ))
            }
        }
    }

    fn join_token(&self, room_name: &str, identity: &str) -> UseCaseResult<String> {
        self.media
            .issue_join_token(room_name, identity)
            .map_err(|err| {
                error!(room_name, error = ?err, "access_gate: failed to sign join token");
                UseCaseError::Internal(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::{interfaces::media::MockMediaRoomService, usecases::accounts::AccountResolver},
        domain::{
            entities::{purchases::PurchaseEntity, rooms::RoomEntity},
            repositories::{
                purchases::MockPurchaseRepository, rooms::MockRoomRepository,
                users::MockUserRepository,
            },
            value_objects::enums::purchase_statuses::PurchaseStatus,
        },
    };
    use chrono::Utc;

    type Gate = AccessGateUseCase<
        MockUserRepository,
        MockRoomRepository,
        MockPurchaseRepository,
        MockMediaRoomService,
    >;

    fn completed_purchase(room_id: Uuid, revoked: bool) -> PurchaseEntity {
        let now = Utc::now();
        PurchaseEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            room_id,
            password: "CAFEBABE".to_string(),
            access_token: "token".to_string(),
            revoked,
            status: PurchaseStatus::Completed.to_string(),
            payment_amount: 100,
            platform_fee: 20,
            creator_share: 80,
            currency: "usd".to_string(),
            payment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn gate(
        room_repo: MockRoomRepository,
        purchase_repo: MockPurchaseRepository,
        media: MockMediaRoomService,
    ) -> Gate {
        let room_repo = Arc::new(room_repo);
        let ledger = PurchaseLedgerUseCase::new(
            Arc::new(AccountResolver::new(Arc::new(MockUserRepository::new()))),
            Arc::clone(&room_repo),
            Arc::new(purchase_repo),
        );
        AccessGateUseCase::new(Arc::new(ledger), room_repo, Arc::new(media))
    }

    fn token_model(room_id: Uuid, password: &str) -> MediaTokenModel {
        MediaTokenModel {
            room_id: Some(room_id.to_string()),
            password: Some(password.to_string()),
            user_id: Some("viewer-1".to_string()),
        }
    }

    #[tokio::test]
    async fn validate_password_requires_fields() {
        let gate = gate(
            MockRoomRepository::new(),
            MockPurchaseRepository::new(),
            MockMediaRoomService::new(),
        );

        let err = gate
            .validate_password(ValidatePasswordModel {
                room_id: Some("not-a-uuid".to_string()),
                password: Some("CAFEBABE".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::Validation(_)));

        let err = gate
            .validate_password(ValidatePasswordModel {
                room_id: Some(Uuid::new_v4().to_string()),
                password: Some("  ".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::Validation(_)));
    }

    #[tokio::test]
    async fn issues_token_when_room_already_exists() {
        let room_id = Uuid::new_v4();
        let mut purchase_repo = MockPurchaseRepository::new();
        purchase_repo
            .expect_list_usable_for_room()
            .returning(move |_| Ok(vec![completed_purchase(room_id, false)]));

        let mut media = MockMediaRoomService::new();
        media
            .expect_create_room()
            .returning(|_| Err(MediaServiceError::RoomAlreadyExists));
        media
            .expect_issue_join_token()
            .withf(move |room, identity| {
                room.to_string() == room_id.to_string() && identity.to_string() == "viewer-1"
            })
            .times(1)
            .returning(|_, _| Ok("jwt".to_string()));

        let dto = gate(MockRoomRepository::new(), purchase_repo, media)
            .issue_media_token(token_model(room_id, "CAFEBABE"))
            .await
            .unwrap();

        assert_eq!(dto.token, "jwt");
    }

    #[tokio::test]
    async fn wrong_password_never_reaches_media_service() {
        let room_id = Uuid::new_v4();
        let mut purchase_repo = MockPurchaseRepository::new();
        purchase_repo
            .expect_list_usable_for_room()
            .returning(move |_| Ok(vec![completed_purchase(room_id, false)]));

        let mut media = MockMediaRoomService::new();
        media.expect_create_room().never();
        media.expect_issue_join_token().never();

        let err = gate(MockRoomRepository::new(), purchase_repo, media)
            .issue_media_token(token_model(room_id, "DEADBEEF"))
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::InvalidCredentials));
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_bad_gateway() {
        let room_id = Uuid::new_v4();
        let mut purchase_repo = MockPurchaseRepository::new();
        purchase_repo
            .expect_list_usable_for_room()
            .returning(move |_| Ok(vec![completed_purchase(room_id, false)]));

        let mut media = MockMediaRoomService::new();
        media
            .expect_create_room()
            .returning(|_| Err(MediaServiceError::Upstream("503".to_string())));
        media.expect_issue_join_token().never();

        let err = gate(MockRoomRepository::new(), purchase_repo, media)
            .issue_media_token(token_model(room_id, "CAFEBABE"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn creator_media_room_requires_ownership() {
        let (room_id, owner_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut room_repo = MockRoomRepository::new();
        room_repo.expect_find_by_id().returning(move |_| {
            let now = Utc::now();
            Ok(Some(RoomEntity {
                id: room_id,
                name: "Room".to_string(),
                price: 3.0,
                creator_id: owner_id,
                created_at: now,
                updated_at: now,
            }))
        });

        let mut media = MockMediaRoomService::new();
        media.expect_create_room().times(1).returning(|_| Ok(()));
        media
            .expect_issue_join_token()
            .times(1)
            .returning(|_, _| Ok("jwt".to_string()));

        let gate = gate(room_repo, MockPurchaseRepository::new(), media);
        let room_id_raw = room_id.to_string();

        let err = gate
            .create_media_room(Uuid::new_v4(), "intruder", Some(&room_id_raw))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::Forbidden));

        let dto = gate
            .create_media_room(owner_id, "creator", Some(&room_id_raw))
            .await
            .unwrap();
        assert_eq!(dto.room_id, room_id);
        assert_eq!(dto.token, "jwt");
    }
}
