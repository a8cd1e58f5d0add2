use std::{collections::HashMap, sync::Arc};

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        errors::{UseCaseError, UseCaseResult},
        usecases::{accounts::AccountResolver, authorization::RoomAuthorizer},
    },
    domain::{
        entities::purchases::{PurchaseEntity, UpsertPurchaseEntity},
        repositories::{
            purchases::PurchaseRepository, rooms::RoomRepository, users::UserRepository,
        },
        value_objects::{
            credentials::{generate_access_token, generate_room_password, secrets_match},
            enums::purchase_statuses::PurchaseStatus,
            fees::FeeSplit,
            purchases::{
                DEFAULT_CURRENCY, PurchaseDto, RecordOutcome, RecordPaymentModel,
                RecordedPayment, ResolvedAccessDto,
            },
        },
    },
};

/// Authoritative record of who may enter which room.
pub struct PurchaseLedgerUseCase<U, R, P>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
{
    accounts: Arc<AccountResolver<U>>,
    room_repo: Arc<R>,
    purchase_repo: Arc<P>,
    authorizer: RoomAuthorizer<R>,
}

impl<U, R, P> PurchaseLedgerUseCase<U, R, P>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
{
    pub fn new(accounts: Arc<AccountResolver<U>>, room_repo: Arc<R>, purchase_repo: Arc<P>) -> Self {
        let authorizer = RoomAuthorizer::new(Arc::clone(&room_repo));
        Self {
            accounts,
            room_repo,
            purchase_repo,
            authorizer,
        }
    }

    pub async fn record_payment(&self, model: RecordPaymentModel) -> UseCaseResult<RecordedPayment> {
        let room_id = model.room_id;
        if model.amount <= 0 {
            return Err(UseCaseError::Validation(
                "amount must be greater than 0".to_string(),
            ));
        }
        if model.external_user_id.trim().is_empty() {
            return Err(UseCaseError::Validation(
                "external user id is required".to_string(),
            ));
        }

        self.authorizer.find_room(room_id).await?;

        if let Some(payment_id) = model.payment_id.as_deref() {
            if let Some(recorded) = self.already_recorded(room_id, payment_id).await? {
                return Ok(recorded);
            }
        }

        let user_id = self
            .accounts
            .resolve(&model.external_user_id, model.email.clone())
            .await?;

        let split = FeeSplit::for_amount(model.amount);
        let currency = match model.currency.trim() {
            "" => DEFAULT_CURRENCY.to_string(),
            currency => currency.to_lowercase(),
        };

        let claimed = self
            .purchase_repo
            .upsert_processing(UpsertPurchaseEntity {
                user_id,
                room_id,
                password: generate_room_password(),
                access_token: generate_access_token(),
                status: PurchaseStatus::Processing.to_string(),
                payment_amount: model.amount,
                platform_fee: split.platform_fee,
                creator_share: split.creator_share,
                currency: currency.clone(),
                payment_id: model.payment_id.clone(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, %room_id, db_error = ?err, "ledger: failed to upsert purchase");
                UseCaseError::Internal(err)
            })?;

        let Some(purchase_id) = claimed else {
            // Lost the claim to a concurrent delivery of the same payment id.
            let payment_id = model.payment_id.as_deref().unwrap_or_default();
            return self
                .already_recorded(room_id, payment_id)
                .await?
                .ok_or_else(|| {
                    UseCaseError::Internal(anyhow::anyhow!(
                        "payment {payment_id} is claimed but has no purchase"
                    ))
                });
        };

        info!(
            %purchase_id,
            %user_id,
            %room_id,
            amount = model.amount,
            platform_fee = split.platform_fee,
            creator_share = split.creator_share,
            %currency,
            "ledger: payment recorded as processing"
        );

        Ok(RecordedPayment {
            purchase_id,
            outcome: RecordOutcome::Created,
            platform_fee: split.platform_fee,
            currency,
        })
    }

    async fn already_recorded(
        &self,
        room_id: Uuid,
        payment_id: &str,
    ) -> UseCaseResult<Option<RecordedPayment>> {
        let existing = self
            .purchase_repo
            .find_by_payment_id(room_id, payment_id.to_string())
            .await
            .map_err(|err| {
                error!(%room_id, payment_id, db_error = ?err, "ledger: failed to look up payment");
                UseCaseError::Internal(err)
            })?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let status = existing.status.parse::<PurchaseStatus>()?;
        info!(
            %room_id,
            payment_id,
            purchase_id = %existing.id,
            %status,
            "ledger: payment already recorded"
        );
        Ok(Some(RecordedPayment {
            purchase_id: existing.id,
            outcome: RecordOutcome::AlreadyRecorded(status),
            platform_fee: existing.platform_fee,
            currency: existing.currency,
        }))
    }

    pub async fn mark_completed(&self, purchase_id: Uuid) -> UseCaseResult<()> {
        self.finish(purchase_id, PurchaseStatus::Completed).await
    }

    pub async fn mark_failed(&self, purchase_id: Uuid) -> UseCaseResult<()> {
        self.finish(purchase_id, PurchaseStatus::Failed).await
    }

    async fn finish(&self, purchase_id: Uuid, target: PurchaseStatus) -> UseCaseResult<()> {
        let affected = self
            .purchase_repo
            .transition_status(purchase_id, PurchaseStatus::Processing, target)
            .await
            .map_err(|err| {
                error!(%purchase_id, %target, db_error = ?err, "ledger: failed to update status");
                UseCaseError::Internal(err)
            })?;

        if affected > 0 {
            info!(%purchase_id, %target, "ledger: purchase status updated");
            return Ok(());
        }

        let current = self.load(purchase_id).await?;
        let status = current.status.parse::<PurchaseStatus>()?;
        if status == target {
            info!(%purchase_id, %target, "ledger: purchase already in target status");
            return Ok(());
        }

        warn!(%purchase_id, from = %status, to = %target, "ledger: rejected status transition");
        Err(UseCaseError::InvalidTransition {
            from: status,
            to: target,
        })
    }

    /// Creator-initiated invalidation. Repeating it is a no-op.
    pub async fn revoke(&self, purchase_id: Uuid, requesting_user_id: Uuid) -> UseCaseResult<()> {
        let purchase = self.load(purchase_id).await?;
        self.authorizer
            .assert_owns_room(requesting_user_id, purchase.room_id)
            .await?;

        if purchase.revoked {
            info!(%purchase_id, "ledger: purchase already revoked");
            return Ok(());
        }

        let affected = self
            .purchase_repo
            .mark_revoked(purchase_id)
            .await
            .map_err(|err| {
                error!(%purchase_id, db_error = ?err, "ledger: failed to revoke purchase");
                UseCaseError::Internal(err)
            })?;
        if affected == 0 {
            return Err(UseCaseError::NotFound("purchase"));
        }

        info!(%purchase_id, revoked_by = %requesting_user_id, "ledger: purchase revoked");
        Ok(())
    }

    /// Returns the matching purchase id, or `InvalidCredentials`.
    pub async fn validate(&self, room_id: Uuid, password: &str) -> UseCaseResult<Uuid> {
        let candidates = self
            .purchase_repo
            .list_usable_for_room(room_id)
            .await
            .map_err(|err| {
                error!(%room_id, db_error = ?err, "ledger: failed to load purchases for room");
                UseCaseError::Internal(err)
            })?;

        let matched = candidates
            .iter()
            .filter(|purchase| is_usable(purchase))
            .find(|purchase| secrets_match(&purchase.password, password));

        match matched {
            Some(purchase) => {
                info!(%room_id, purchase_id = %purchase.id, "ledger: password accepted");
                Ok(purchase.id)
            }
            None => {
                warn!(%room_id, "ledger: password rejected");
                Err(UseCaseError::InvalidCredentials)
            }
        }
    }

    pub async fn resolve_by_token(&self, token: &str) -> UseCaseResult<ResolvedAccessDto> {
        let token = token.trim();
        if token.is_empty() {
            return Err(UseCaseError::Validation("token is required".to_string()));
        }

        let purchase = self
            .purchase_repo
            .find_by_access_token(token.to_string())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "ledger: failed to look up access token");
                UseCaseError::Internal(err)
            })?
            .filter(is_usable)
            .ok_or(UseCaseError::NotFound("access token"))?;

        Ok(ResolvedAccessDto {
            room_id: purchase.room_id,
            password: purchase.password,
        })
    }

    pub async fn list_for_creator(&self, creator_user_id: Uuid) -> UseCaseResult<Vec<PurchaseDto>> {
        let rooms = self
            .room_repo
            .list_by_creator(creator_user_id)
            .await
            .map_err(|err| {
                error!(%creator_user_id, db_error = ?err, "ledger: failed to list creator rooms");
                UseCaseError::Internal(err)
            })?;
        if rooms.is_empty() {
            return Ok(Vec::new());
        }

        let room_names: HashMap<Uuid, String> =
            rooms.into_iter().map(|room| (room.id, room.name)).collect();

        let purchases = self
            .purchase_repo
            .list_for_rooms(room_names.keys().copied().collect())
            .await
            .map_err(|err| {
                error!(%creator_user_id, db_error = ?err, "ledger: failed to list purchases");
                UseCaseError::Internal(err)
            })?;
        if purchases.is_empty() {
            return Ok(Vec::new());
        }

        let mut buyer_ids: Vec<Uuid> = purchases.iter().map(|purchase| purchase.user_id).collect();
        buyer_ids.sort_unstable();
        buyer_ids.dedup();
        let emails = self.accounts.emails_for(buyer_ids).await?;

        let mut dtos = Vec::with_capacity(purchases.len());
        for purchase in purchases {
            dtos.push(PurchaseDto {
                id: purchase.id,
                room_id: purchase.room_id,
                room_name: room_names
                    .get(&purchase.room_id)
                    .cloned()
                    .unwrap_or_default(),
                user_id: purchase.user_id,
                user_email: emails.get(&purchase.user_id).cloned().flatten(),
                password: purchase.password,
                revoked: purchase.revoked,
                status: purchase.status.parse::<PurchaseStatus>()?,
                payment_amount: purchase.payment_amount,
                platform_fee: purchase.platform_fee,
                creator_share: purchase.creator_share,
                currency: purchase.currency,
                created_at: purchase.created_at,
            });
        }

        info!(%creator_user_id, purchase_count = dtos.len(), "ledger: creator purchases loaded");
        Ok(dtos)
    }

    async fn load(&self, purchase_id: Uuid) -> UseCaseResult<PurchaseEntity> {
        self.purchase_repo
            .find_by_id(purchase_id)
            .await
            .map_err(|err| {
                error!(%purchase_id, db_error = ?err, "ledger: failed to load purchase");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("purchase"))
    }
}

fn is_usable(purchase: &PurchaseEntity) -> bool {
    !purchase.revoked && purchase.status == PurchaseStatus::Completed.to_string()
}
