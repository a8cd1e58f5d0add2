use std::{collections::HashMap, sync::Arc};

use anyhow::anyhow;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::errors::{UseCaseError, UseCaseResult},
    domain::{
        entities::users::{InsertUserEntity, UserEntity},
        repositories::users::UserRepository,
    },
};

/// Maps commerce-platform identities onto internal users.
pub struct AccountResolver<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
}

impl<U> AccountResolver<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Returns the internal id for `external_id`, creating the user on first sight.
    pub async fn resolve(&self, external_id: &str, email: Option<String>) -> UseCaseResult<Uuid> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(UseCaseError::Validation(
                "external user id is required".to_string(),
            ));
        }
        let email = email
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if let Some(user) = self.lookup(external_id).await? {
            self.backfill_email(&user, email).await?;
            return Ok(user.id);
        }

        let inserted = self
            .user_repo
            .insert_if_absent(InsertUserEntity {
                external_id: external_id.to_string(),
                email: email.clone(),
            })
            .await
            .map_err(|err| {
                error!(external_id, db_error = ?err, "accounts: failed to insert user");
                UseCaseError::Internal(err)
            })?;

        if let Some(user_id) = inserted {
            info!(external_id, %user_id, "accounts: user created");
            return Ok(user_id);
        }

        // Lost an insert race; the row exists now.
        warn!(external_id, "accounts: concurrent insert detected, re-reading user");
        match self.lookup(external_id).await? {
            Some(user) => {
                self.backfill_email(&user, email).await?;
                Ok(user.id)
            }
            None => Err(UseCaseError::Internal(anyhow!(
                "user {external_id} missing after conflicting insert"
            ))),
        }
    }

    /// Read-only lookup. Never creates a user.
    pub async fn find(&self, external_id: &str) -> UseCaseResult<Option<Uuid>> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Ok(None);
        }
        Ok(self.lookup(external_id).await?.map(|user| user.id))
    }

    pub async fn exists(&self, user_id: Uuid) -> UseCaseResult<bool> {
        let users = self.user_repo.find_by_ids(vec![user_id]).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "accounts: failed to load user");
            UseCaseError::Internal(err)
        })?;
        Ok(!users.is_empty())
    }

    pub async fn emails_for(
        &self,
        user_ids: Vec<Uuid>,
    ) -> UseCaseResult<HashMap<Uuid, Option<String>>> {
        let users = self.user_repo.find_by_ids(user_ids).await.map_err(|err| {
            error!(db_error = ?err, "accounts: failed to load user emails");
            UseCaseError::Internal(err)
        })?;
        Ok(users.into_iter().map(|user| (user.id, user.email)).collect())
    }

    async fn lookup(&self, external_id: &str) -> UseCaseResult<Option<UserEntity>> {
        self.user_repo
            .find_by_external_id(external_id.to_string())
            .await
            .map_err(|err| {
                error!(external_id, db_error = ?err, "accounts: failed to look up user");
                UseCaseError::Internal(err)
            })
    }

    async fn backfill_email(&self, user: &UserEntity, email: Option<String>) -> UseCaseResult<()> {
        let Some(email) = email else {
            return Ok(());
        };
        if user.email.is_some() {
            return Ok(());
        }

        self.user_repo
            .backfill_email(user.id, email)
            .await
            .map_err(|err| {
                error!(user_id = %user.id, db_error = ?err, "accounts: failed to backfill email");
                UseCaseError::Internal(err)
            })?;
        info!(user_id = %user.id, "accounts: email backfilled");
        Ok(())
    }
}
