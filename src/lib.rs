pub mod application;
pub mod axum_http;
pub mod background_worker;
pub mod config;
pub mod domain;
pub mod infra;
pub mod observability;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::{
    application::usecases::{
        accounts::AccountResolver, payment_webhook::PaymentWebhookUseCase,
        purchase_ledger::PurchaseLedgerUseCase,
    },
    axum_http::{auth::SessionVerifier, http_serve::ExternalClients},
    background_worker::payment_worker::{self, PaymentJobQueue},
    infra::{
        commerce::whop_client::{WhopClient, WhopWebhookVerifier},
        media::livekit_client::LiveKitClient,
        postgres::{
            postgres_connection,
            repositories::{purchases::PurchasePostgres, rooms::RoomPostgres, users::UserPostgres},
        },
    },
};

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("room-gate")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = Arc::new(postgres_connection::establish_connection(
        &dotenvy_env.database,
    )?);
    info!("Postgres connection has been established");

    let whop_client = Arc::new(WhopClient::new(dotenvy_env.whop.clone()));
    let media_client = Arc::new(LiveKitClient::new(dotenvy_env.livekit.clone())?);
    let webhook_verifier = Arc::new(WhopWebhookVerifier::new(
        dotenvy_env.whop.webhook_secret.clone(),
    ));
    let session_verifier = Arc::new(SessionVerifier::new(&dotenvy_env.session.jwt_secret));

    let room_repository = Arc::new(RoomPostgres::new(Arc::clone(&postgres_pool)));
    let account_resolver = Arc::new(AccountResolver::new(Arc::new(UserPostgres::new(
        Arc::clone(&postgres_pool),
    ))));
    let ledger = Arc::new(PurchaseLedgerUseCase::new(
        account_resolver,
        room_repository,
        Arc::new(PurchasePostgres::new(Arc::clone(&postgres_pool))),
    ));
    let payment_usecase = Arc::new(PaymentWebhookUseCase::new(ledger, whop_client));

    let (payment_queue, payment_jobs) = PaymentJobQueue::new();
    let payment_worker = tokio::spawn(payment_worker::run_payment_worker(
        payment_jobs,
        payment_usecase,
    ));
    info!("Payment worker started");

    let clients = ExternalClients {
        media: media_client,
        webhook_verifier,
        session_verifier,
        payment_queue,
    };

    axum_http::http_serve::start(dotenvy_env, postgres_pool, clients).await?;

    // Dropping the router closed the last queue sender; let queued payments finish.
    payment_worker.await?;
    info!("Payment worker drained");

    Ok(())
}
