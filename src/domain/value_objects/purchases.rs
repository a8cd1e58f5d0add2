use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::enums::purchase_statuses::PurchaseStatus;

pub const DEFAULT_CURRENCY: &str = "usd";

/// A payment the ledger should turn into an entitlement.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPaymentModel {
    pub external_user_id: String,
    pub email: Option<String>,
    pub room_id: Uuid,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub payment_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Created,
    AlreadyRecorded(PurchaseStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPayment {
    pub purchase_id: Uuid,
    pub outcome: RecordOutcome,
    pub platform_fee: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDto {
    pub id: Uuid,
    pub room_id: Uuid,
    pub room_name: String,
    pub user_id: Uuid,
    pub user_email: Option<String>,
    pub password: String,
    pub revoked: bool,
    pub status: PurchaseStatus,
    pub payment_amount: i64,
    pub platform_fee: i64,
    pub creator_share: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAccessDto {
    pub room_id: Uuid,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePasswordModel {
    pub room_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokePurchaseModel {
    pub purchase_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveTokenQuery {
    pub token: Option<String>,
}
