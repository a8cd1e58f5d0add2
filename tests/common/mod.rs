#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use room_gate::{
    application::{
        interfaces::payouts::PlatformPayout,
        usecases::{
            accounts::AccountResolver, payment_webhook::PaymentWebhookUseCase,
            purchase_ledger::PurchaseLedgerUseCase,
        },
    },
    domain::{
        entities::{
            purchases::{PurchaseEntity, UpsertPurchaseEntity},
            rooms::{InsertRoomEntity, RoomEntity},
            users::{InsertUserEntity, UserEntity},
        },
        repositories::{
            purchases::PurchaseRepository, rooms::RoomRepository, users::UserRepository,
        },
        value_objects::enums::purchase_statuses::PurchaseStatus,
    },
};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryUsers {
    rows: DashMap<Uuid, UserEntity>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_external_id(&self, external_id: String) -> Result<Option<UserEntity>> {
        Ok(self
            .rows
            .iter()
            .find(|row| row.external_id == external_id)
            .map(|row| row.value().clone()))
    }

    async fn insert_if_absent(&self, insert_user_entity: InsertUserEntity) -> Result<Option<Uuid>> {
        if self
            .rows
            .iter()
            .any(|row| row.external_id == insert_user_entity.external_id)
        {
            return Ok(None);
        }
        let now = Utc::now();
        let id = Uuid::new_v4();
        self.rows.insert(
            id,
            UserEntity {
                id,
                external_id: insert_user_entity.external_id,
                email: insert_user_entity.email,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(Some(id))
    }

    async fn backfill_email(&self, user_id: Uuid, email: String) -> Result<()> {
        if let Some(mut row) = self.rows.get_mut(&user_id) {
            if row.email.is_none() {
                row.email = Some(email);
                row.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn find_by_ids(&self, user_ids: Vec<Uuid>) -> Result<Vec<UserEntity>> {
        Ok(user_ids
            .iter()
            .filter_map(|id| self.rows.get(id).map(|row| row.value().clone()))
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryRooms {
    rows: DashMap<Uuid, RoomEntity>,
}

#[async_trait]
impl RoomRepository for MemoryRooms {
    async fn create(&self, insert_room_entity: InsertRoomEntity) -> Result<RoomEntity> {
        let now = Utc::now();
        let room = RoomEntity {
            id: Uuid::new_v4(),
            name: insert_room_entity.name,
            price: insert_room_entity.price,
            creator_id: insert_room_entity.creator_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, room_id: Uuid) -> Result<Option<RoomEntity>> {
        Ok(self.rows.get(&room_id).map(|row| row.value().clone()))
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<RoomEntity>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row.creator_id == creator_id)
            .map(|row| row.value().clone())
            .collect())
    }
}

/// Mirrors the unique (user_id, room_id) index of the purchases table and the
/// (room_id, payment_id) key of purchase_payments.
#[derive(Default)]
pub struct MemoryPurchases {
    rows: DashMap<Uuid, PurchaseEntity>,
    payments: DashMap<(Uuid, String), Uuid>,
}

impl MemoryPurchases {
    pub fn all(&self) -> Vec<PurchaseEntity> {
        self.rows.iter().map(|row| row.value().clone()).collect()
    }
}

#[async_trait]
impl PurchaseRepository for MemoryPurchases {
    async fn find_by_id(&self, purchase_id: Uuid) -> Result<Option<PurchaseEntity>> {
        Ok(self.rows.get(&purchase_id).map(|row| row.value().clone()))
    }

    async fn find_by_payment_id(
        &self,
        room_id: Uuid,
        payment_id: String,
    ) -> Result<Option<PurchaseEntity>> {
        Ok(self
            .payments
            .get(&(room_id, payment_id))
            .and_then(|purchase_id| self.rows.get(purchase_id.value()).map(|row| row.value().clone())))
    }

    async fn find_by_access_token(&self, access_token: String) -> Result<Option<PurchaseEntity>> {
        Ok(self
            .rows
            .iter()
            .find(|row| row.access_token == access_token)
            .map(|row| row.value().clone()))
    }

    async fn upsert_processing(&self, entity: UpsertPurchaseEntity) -> Result<Option<Uuid>> {
        let existing = self
            .rows
            .iter()
            .find(|row| row.user_id == entity.user_id && row.room_id == entity.room_id)
            .map(|row| (row.id, row.revoked, row.created_at));

        let now = Utc::now();
        let (id, revoked, created_at) = existing.unwrap_or((Uuid::new_v4(), false, now));

        if let Some(payment_id) = &entity.payment_id {
            match self.payments.entry((entity.room_id, payment_id.clone())) {
                Entry::Occupied(_) => return Ok(None),
                Entry::Vacant(claim) => {
                    claim.insert(id);
                }
            }
        }

        self.rows.insert(
            id,
            PurchaseEntity {
                id,
                user_id: entity.user_id,
                room_id: entity.room_id,
                password: entity.password,
                access_token: entity.access_token,
                revoked,
                status: entity.status,
                payment_amount: entity.payment_amount,
                platform_fee: entity.platform_fee,
                creator_share: entity.creator_share,
                currency: entity.currency,
                payment_id: entity.payment_id,
                created_at,
                updated_at: now,
            },
        );
        Ok(Some(id))
    }

    async fn transition_status(
        &self,
        purchase_id: Uuid,
        from: PurchaseStatus,
        to: PurchaseStatus,
    ) -> Result<usize> {
        match self.rows.get_mut(&purchase_id) {
            Some(mut row) if row.status == from.to_string() => {
                row.status = to.to_string();
                row.updated_at = Utc::now();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn mark_revoked(&self, purchase_id: Uuid) -> Result<usize> {
        match self.rows.get_mut(&purchase_id) {
            Some(mut row) => {
                row.revoked = true;
                row.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list_usable_for_room(&self, room_id: Uuid) -> Result<Vec<PurchaseEntity>> {
        let completed = PurchaseStatus::Completed.to_string();
        Ok(self
            .rows
            .iter()
            .filter(|row| row.room_id == room_id && !row.revoked && row.status == completed)
            .map(|row| row.value().clone())
            .collect())
    }

    async fn list_for_rooms(&self, room_ids: Vec<Uuid>) -> Result<Vec<PurchaseEntity>> {
        let mut purchases: Vec<PurchaseEntity> = self
            .rows
            .iter()
            .filter(|row| room_ids.contains(&row.room_id))
            .map(|row| row.value().clone())
            .collect();
        purchases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(purchases)
    }
}

/// Records every payout and optionally fails them all.
#[derive(Default)]
pub struct RecordingPayout {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub paid: DashMap<usize, (i64, String)>,
}

impl RecordingPayout {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformPayout for RecordingPayout {
    async fn payout(&self, amount: i64, currency: String) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("transfer rejected by provider");
        }
        self.paid.insert(call, (amount, currency));
        Ok(())
    }
}

pub type Ledger = PurchaseLedgerUseCase<MemoryUsers, MemoryRooms, MemoryPurchases>;
pub type Processor = PaymentWebhookUseCase<MemoryUsers, MemoryRooms, MemoryPurchases, RecordingPayout>;

pub struct Harness {
    pub users: Arc<MemoryUsers>,
    pub rooms: Arc<MemoryRooms>,
    pub purchases: Arc<MemoryPurchases>,
    pub payout: Arc<RecordingPayout>,
    pub accounts: Arc<AccountResolver<MemoryUsers>>,
    pub ledger: Arc<Ledger>,
    pub processor: Arc<Processor>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_payout(RecordingPayout::default())
    }

    pub fn with_payout(payout: RecordingPayout) -> Self {
        let users = Arc::new(MemoryUsers::default());
        let rooms = Arc::new(MemoryRooms::default());
        let purchases = Arc::new(MemoryPurchases::default());
        let payout = Arc::new(payout);

        let accounts = Arc::new(AccountResolver::new(Arc::clone(&users)));
        let ledger = Arc::new(PurchaseLedgerUseCase::new(
            Arc::clone(&accounts),
            Arc::clone(&rooms),
            Arc::clone(&purchases),
        ));
        let processor = Arc::new(PaymentWebhookUseCase::new(
            Arc::clone(&ledger),
            Arc::clone(&payout),
        ));

        Self {
            users,
            rooms,
            purchases,
            payout,
            accounts,
            ledger,
            processor,
        }
    }

    /// Creates a creator account plus one room and returns (creator_id, room).
    pub async fn seed_room(&self, creator_external_id: &str, price: f64) -> (Uuid, RoomEntity) {
        let creator_id = self
            .accounts
            .resolve(creator_external_id, None)
            .await
            .unwrap();
        let room = self
            .rooms
            .create(InsertRoomEntity {
                name: "Backstage".to_string(),
                price,
                creator_id,
            })
            .await
            .unwrap();
        (creator_id, room)
    }
}
