use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::purchases::{PurchaseEntity, UpsertPurchaseEntity},
    value_objects::enums::purchase_statuses::PurchaseStatus,
};

#[automock]
#[async_trait]
pub trait PurchaseRepository {
    async fn find_by_id(&self, purchase_id: Uuid) -> Result<Option<PurchaseEntity>>;
    /// Purchase produced by any earlier delivery of this payment id for the room.
    async fn find_by_payment_id(
        &self,
        room_id: Uuid,
        payment_id: String,
    ) -> Result<Option<PurchaseEntity>>;
    async fn find_by_access_token(&self, access_token: String) -> Result<Option<PurchaseEntity>>;
    /// Claims the payment id and inserts or overwrites the (user, room) entitlement in one
    /// transaction, leaving `revoked` untouched. `None` when the payment id was already claimed.
    async fn upsert_processing(
        &self,
        upsert_purchase_entity: UpsertPurchaseEntity,
    ) -> Result<Option<Uuid>>;
    /// Moves `purchase_id` from `from` to `to`; returns affected rows.
    async fn transition_status(
        &self,
        purchase_id: Uuid,
        from: PurchaseStatus,
        to: PurchaseStatus,
    ) -> Result<usize>;
    async fn mark_revoked(&self, purchase_id: Uuid) -> Result<usize>;
    /// Non-revoked, completed entitlements for the room.
    async fn list_usable_for_room(&self, room_id: Uuid) -> Result<Vec<PurchaseEntity>>;
    /// Newest first.
    async fn list_for_rooms(&self, room_ids: Vec<Uuid>) -> Result<Vec<PurchaseEntity>>;
}
