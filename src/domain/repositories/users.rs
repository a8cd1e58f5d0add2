use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{InsertUserEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_external_id(&self, external_id: String) -> Result<Option<UserEntity>>;
    /// `None` when another writer inserted the same external id first.
    async fn insert_if_absent(&self, insert_user_entity: InsertUserEntity) -> Result<Option<Uuid>>;
    /// Only fills an empty email, never overwrites one.
    async fn backfill_email(&self, user_id: Uuid, email: String) -> Result<()>;
    async fn find_by_ids(&self, user_ids: Vec<Uuid>) -> Result<Vec<UserEntity>>;
}
