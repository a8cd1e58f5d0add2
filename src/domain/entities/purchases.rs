use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::postgres::schema::{purchase_payments, purchases};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = purchases)]
pub struct PurchaseEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub password: String,
    pub access_token: String,
    pub revoked: bool,
    pub status: String,
    pub payment_amount: i64,
    pub platform_fee: i64,
    pub creator_share: i64,
    pub currency: String,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row written for a new (or repeated) payment on a (user, room) pair.
/// `revoked` is absent on purpose: the upsert must never reset it.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = purchases)]
pub struct UpsertPurchaseEntity {
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub password: String,
    pub access_token: String,
    pub status: String,
    pub payment_amount: i64,
    pub platform_fee: i64,
    pub creator_share: i64,
    pub currency: String,
    pub payment_id: Option<String>,
}

/// Claim on a payment id; the primary key makes each (room, payment) count once.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = purchase_payments)]
pub struct InsertPurchasePaymentEntity {
    pub room_id: Uuid,
    pub payment_id: String,
}
