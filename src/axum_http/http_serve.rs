use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    axum_http::{auth::SessionVerifier, default_routers, routers},
    background_worker::payment_worker::PaymentJobQueue,
    config::config_model::DotEnvyConfig,
    infra::{
        commerce::whop_client::WhopWebhookVerifier, media::livekit_client::LiveKitClient,
        postgres::postgres_connection::PgPoolSquad,
    },
};

/// Clients built once at startup and shared by every router.
pub struct ExternalClients {
    pub media: Arc<LiveKitClient>,
    pub webhook_verifier: Arc<WhopWebhookVerifier>,
    pub session_verifier: Arc<SessionVerifier>,
    pub payment_queue: PaymentJobQueue,
}

pub fn build_router(
    config: Arc<DotEnvyConfig>,
    db_pool: Arc<PgPoolSquad>,
    clients: ExternalClients,
) -> Result<Router> {
    let api = Router::new()
        .nest("/rooms", routers::rooms::routes(Arc::clone(&db_pool)))
        .nest(
            "/purchases",
            routers::purchases::routes(Arc::clone(&db_pool)).merge(routers::webhooks::routes(
                clients.webhook_verifier,
                clients.payment_queue,
            )),
        )
        .nest(
            "/creator/purchases",
            routers::creator_purchases::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/checkout",
            routers::checkout::routes(Arc::clone(&db_pool), Arc::clone(&config)),
        )
        .nest("/chat", routers::chat::routes(Arc::clone(&db_pool)))
        .merge(routers::access::routes(Arc::clone(&db_pool), clients.media))
        .route("/health-check", get(default_routers::health_check));

    let app = Router::new()
        .nest("/api/v1", api)
        .fallback(default_routers::not_found)
        .layer(Extension(clients.session_verifier))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.timeout),
        ))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

pub async fn start(
    config: Arc<DotEnvyConfig>,
    db_pool: Arc<PgPoolSquad>,
    clients: ExternalClients,
) -> Result<()> {
    let app = build_router(Arc::clone(&config), db_pool, clients)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
