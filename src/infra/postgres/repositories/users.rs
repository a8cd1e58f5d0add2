use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::users::{InsertUserEntity, UserEntity},
        repositories::users::UserRepository,
    },
    infra::postgres::{postgres_connection::PgPoolSquad, schema::users},
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn find_by_external_id(&self, external_id: String) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::external_id.eq(external_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert_if_absent(&self, insert_user_entity: InsertUserEntity) -> Result<Option<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(users::table)
            .values(&insert_user_entity)
            .on_conflict(users::external_id)
            .do_nothing()
            .returning(users::id)
            .get_result::<Uuid>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn backfill_email(&self, user_id: Uuid, email: String) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(users::table)
            .filter(users::id.eq(user_id))
            .filter(users::email.is_null())
            .set((
                users::email.eq(Some(email)),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn find_by_ids(&self, user_ids: Vec<Uuid>) -> Result<Vec<UserEntity>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = users::table
            .filter(users::id.eq_any(user_ids))
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        Ok(results)
    }
}
