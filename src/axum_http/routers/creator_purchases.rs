use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::info;

use crate::{
    application::{
        errors::{UseCaseError, parse_id},
        usecases::{accounts::AccountResolver, purchase_ledger::PurchaseLedgerUseCase},
    },
    axum_http::{
        auth::SessionUser,
        error_responses::{AppError, json_body},
    },
    domain::{
        repositories::{
            purchases::PurchaseRepository, rooms::RoomRepository, users::UserRepository,
        },
        value_objects::purchases::RevokePurchaseModel,
    },
    infra::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{purchases::PurchasePostgres, rooms::RoomPostgres, users::UserPostgres},
    },
};

pub struct CreatorPurchasesState<U, R, P>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
{
    pub accounts: Arc<AccountResolver<U>>,
    pub ledger: PurchaseLedgerUseCase<U, R, P>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let accounts = Arc::new(AccountResolver::new(Arc::new(UserPostgres::new(
        Arc::clone(&db_pool),
    ))));
    let ledger = PurchaseLedgerUseCase::new(
        Arc::clone(&accounts),
        Arc::new(RoomPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PurchasePostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route("/", get(list_purchases))
        .route("/revoke", post(revoke_purchase))
        .with_state(Arc::new(CreatorPurchasesState { accounts, ledger }))
}

pub async fn list_purchases<U, R, P>(
    State(state): State<Arc<CreatorPurchasesState<U, R, P>>>,
    user: SessionUser,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
{
    let purchases = match state.accounts.find(&user.external_id).await? {
        Some(creator_id) => state.ledger.list_for_creator(creator_id).await?,
        None => Vec::new(),
    };

    Ok(Json(json!({ "purchases": purchases })))
}

pub async fn revoke_purchase<U, R, P>(
    State(state): State<Arc<CreatorPurchasesState<U, R, P>>>,
    user: SessionUser,
    payload: Result<Json<RevokePurchaseModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
{
    let model = json_body(payload)?;
    let purchase_id = parse_id(model.purchase_id.as_deref(), "purchaseId")?;

    let creator_id = state
        .accounts
        .find(&user.external_id)
        .await?
        .ok_or(UseCaseError::NotFound("creator"))?;

    state.ledger.revoke(purchase_id, creator_id).await?;
    info!(%purchase_id, %creator_id, "creator_purchases: revoke handled");

    Ok(Json(json!({ "success": true })))
}
