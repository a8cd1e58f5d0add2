use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};

use crate::{
    application::usecases::{accounts::AccountResolver, purchase_ledger::PurchaseLedgerUseCase},
    axum_http::error_responses::AppError,
    domain::{
        repositories::{
            purchases::PurchaseRepository, rooms::RoomRepository, users::UserRepository,
        },
        value_objects::purchases::ResolveTokenQuery,
    },
    infra::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{purchases::PurchasePostgres, rooms::RoomPostgres, users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let ledger = PurchaseLedgerUseCase::new(
        Arc::new(AccountResolver::new(Arc::new(UserPostgres::new(
            Arc::clone(&db_pool),
        )))),
        Arc::new(RoomPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PurchasePostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route("/resolve", get(resolve_access_token))
        .with_state(Arc::new(ledger))
}

/// Exchanges the opaque access token from a purchase link for the room
/// credentials.
pub async fn resolve_access_token<U, R, P>(
    State(ledger): State<Arc<PurchaseLedgerUseCase<U, R, P>>>,
    Query(query): Query<ResolveTokenQuery>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
{
    let token = query.token.unwrap_or_default();
    let resolved = ledger.resolve_by_token(&token).await?;
    Ok(Json(resolved))
}
