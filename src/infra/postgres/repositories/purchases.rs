use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update, upsert::excluded};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::purchases::{InsertPurchasePaymentEntity, PurchaseEntity, UpsertPurchaseEntity},
        repositories::purchases::PurchaseRepository,
        value_objects::enums::purchase_statuses::PurchaseStatus,
    },
    infra::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{purchase_payments, purchases},
    },
};

pub struct PurchasePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PurchasePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PurchaseRepository for PurchasePostgres {
    async fn find_by_id(&self, purchase_id: Uuid) -> Result<Option<PurchaseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = purchases::table
            .find(purchase_id)
            .select(PurchaseEntity::as_select())
            .first::<PurchaseEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_payment_id(
        &self,
        room_id: Uuid,
        payment_id: String,
    ) -> Result<Option<PurchaseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = purchase_payments::table
            .inner_join(purchases::table)
            .filter(purchase_payments::room_id.eq(room_id))
            .filter(purchase_payments::payment_id.eq(payment_id))
            .select(PurchaseEntity::as_select())
            .first::<PurchaseEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_access_token(&self, access_token: String) -> Result<Option<PurchaseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = purchases::table
            .filter(purchases::access_token.eq(access_token))
            .select(PurchaseEntity::as_select())
            .first::<PurchaseEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn upsert_processing(
        &self,
        upsert_purchase_entity: UpsertPurchaseEntity,
    ) -> Result<Option<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<Option<Uuid>, diesel::result::Error, _>(|tx| {
            let claim = upsert_purchase_entity
                .payment_id
                .clone()
                .map(|payment_id| InsertPurchasePaymentEntity {
                    room_id: upsert_purchase_entity.room_id,
                    payment_id,
                });

            if let Some(claim) = &claim {
                let claimed = insert_into(purchase_payments::table)
                    .values(claim)
                    .on_conflict_do_nothing()
                    .execute(tx)?;
                if claimed == 0 {
                    return Ok(None);
                }
            }

            let purchase_id = insert_into(purchases::table)
                .values(&upsert_purchase_entity)
                .on_conflict((purchases::user_id, purchases::room_id))
                .do_update()
                .set((
                    purchases::password.eq(excluded(purchases::password)),
                    purchases::access_token.eq(excluded(purchases::access_token)),
                    purchases::status.eq(excluded(purchases::status)),
                    purchases::payment_amount.eq(excluded(purchases::payment_amount)),
                    purchases::platform_fee.eq(excluded(purchases::platform_fee)),
                    purchases::creator_share.eq(excluded(purchases::creator_share)),
                    purchases::currency.eq(excluded(purchases::currency)),
                    purchases::payment_id.eq(excluded(purchases::payment_id)),
                    purchases::updated_at.eq(Utc::now()),
                ))
                .returning(purchases::id)
                .get_result::<Uuid>(tx)?;

            if let Some(claim) = &claim {
                update(purchase_payments::table)
                    .filter(purchase_payments::room_id.eq(claim.room_id))
                    .filter(purchase_payments::payment_id.eq(&claim.payment_id))
                    .set(purchase_payments::purchase_id.eq(purchase_id))
                    .execute(tx)?;
            }

            Ok(Some(purchase_id))
        })?;

        Ok(result)
    }

    async fn transition_status(
        &self,
        purchase_id: Uuid,
        from: PurchaseStatus,
        to: PurchaseStatus,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(purchases::table)
            .filter(purchases::id.eq(purchase_id))
            .filter(purchases::status.eq(from.to_string()))
            .set((
                purchases::status.eq(to.to_string()),
                purchases::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn mark_revoked(&self, purchase_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(purchases::table)
            .filter(purchases::id.eq(purchase_id))
            .set((
                purchases::revoked.eq(true),
                purchases::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn list_usable_for_room(&self, room_id: Uuid) -> Result<Vec<PurchaseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = purchases::table
            .filter(purchases::room_id.eq(room_id))
            .filter(purchases::revoked.eq(false))
            .filter(purchases::status.eq(PurchaseStatus::Completed.to_string()))
            .select(PurchaseEntity::as_select())
            .load::<PurchaseEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_for_rooms(&self, room_ids: Vec<Uuid>) -> Result<Vec<PurchaseEntity>> {
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = purchases::table
            .filter(purchases::room_id.eq_any(room_ids))
            .order(purchases::created_at.desc())
            .select(PurchaseEntity::as_select())
            .load::<PurchaseEntity>(&mut conn)?;

        Ok(results)
    }
}
