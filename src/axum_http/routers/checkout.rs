use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::post,
};

use crate::{
    application::usecases::{accounts::AccountResolver, checkout::CheckoutUseCase},
    axum_http::{
        auth::SessionUser,
        error_responses::{AppError, json_body},
    },
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{rooms::RoomRepository, users::UserRepository},
        value_objects::checkout::StartCheckoutModel,
    },
    infra::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{rooms::RoomPostgres, users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let usecase = CheckoutUseCase::new(
        Arc::new(AccountResolver::new(Arc::new(UserPostgres::new(
            Arc::clone(&db_pool),
        )))),
        Arc::new(RoomPostgres::new(Arc::clone(&db_pool))),
        config.whop.checkout_base_url.clone(),
    );

    Router::new()
        .route("/start", post(start_checkout))
        .with_state(Arc::new(usecase))
}

pub async fn start_checkout<U, R>(
    State(usecase): State<Arc<CheckoutUseCase<U, R>>>,
    user: SessionUser,
    payload: Result<Json<StartCheckoutModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    let model = json_body(payload)?;
    let checkout = usecase.start(&user.external_id, user.email, model).await?;
    Ok(Json(checkout))
}
