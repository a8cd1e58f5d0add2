use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use url::Url;

use crate::{
    application::{
        errors::{UseCaseResult, parse_id},
        usecases::{accounts::AccountResolver, authorization::RoomAuthorizer},
    },
    domain::{
        repositories::{rooms::RoomRepository, users::UserRepository},
        value_objects::{
            checkout::{CheckoutDto, StartCheckoutModel},
            rooms::RoomSummaryDto,
        },
    },
};

/// Builds the hosted checkout link; the `room_id` metadata comes back on the
/// payment webhook.
pub struct CheckoutUseCase<U, R>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    accounts: Arc<AccountResolver<U>>,
    rooms: RoomAuthorizer<R>,
    checkout_base_url: String,
}

impl<U, R> CheckoutUseCase<U, R>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    pub fn new(accounts: Arc<AccountResolver<U>>, room_repo: Arc<R>, checkout_base_url: String) -> Self {
        Self {
            accounts,
            rooms: RoomAuthorizer::new(room_repo),
            checkout_base_url,
        }
    }

    pub async fn start(
        &self,
        external_id: &str,
        email: Option<String>,
        model: StartCheckoutModel,
    ) -> UseCaseResult<CheckoutDto> {
        let room_id = parse_id(model.room_id.as_deref(), "roomId")?;
        let buyer_id = self.accounts.resolve(external_id, email).await?;
        let room = self.rooms.find_room(room_id).await?;

        let mut checkout_url = Url::parse(&self.checkout_base_url)
            .with_context(|| format!("invalid checkout base url: {}", self.checkout_base_url))?;
        checkout_url
            .query_pairs_mut()
            .append_pair("metadata[room_id]", &room.id.to_string());

        info!(%room_id, %buyer_id, "checkout: checkout started");
        Ok(CheckoutDto {
            checkout_url: checkout_url.to_string(),
            room: RoomSummaryDto::from(&room),
        })
    }
}
