use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use tracing::{error, info, warn};

use crate::{
    application::interfaces::webhooks::WebhookVerifier,
    axum_http::error_responses::AppError,
    background_worker::payment_worker::PaymentJobQueue,
    domain::value_objects::webhook::{WebhookDisposition, WhopWebhookEnvelope},
};

pub const SIGNATURE_HEADER: &str = "x-whop-signature";

pub struct WebhookState<V>
where
    V: WebhookVerifier + 'static,
{
    pub verifier: Arc<V>,
    pub queue: PaymentJobQueue,
}

pub fn routes<V>(verifier: Arc<V>, queue: PaymentJobQueue) -> Router
where
    V: WebhookVerifier + 'static,
{
    Router::new()
        .route("/webhook", post(handle_payment_webhook::<V>))
        .with_state(Arc::new(WebhookState { verifier, queue }))
}

/// Acknowledges every authentic delivery; the payment itself runs on the
/// worker.
pub async fn handle_payment_webhook<V>(
    State(state): State<Arc<WebhookState<V>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError>
where
    V: WebhookVerifier + 'static,
{
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            warn!("webhooks: missing signature header");
            AppError::AuthenticationRequired
        })?;

    state.verifier.verify(&body, signature).map_err(|err| {
        warn!(error = %err, "webhooks: signature rejected");
        AppError::AuthenticationRequired
    })?;

    let envelope: WhopWebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "webhooks: unreadable payload acknowledged");
            return Ok((StatusCode::OK, "OK"));
        }
    };

    let action = envelope.action.clone();
    match envelope.into_disposition() {
        Ok(WebhookDisposition::Enqueue(job)) => {
            let room_id = job.room_id;
            match state.queue.enqueue(job) {
                Ok(()) => info!(%action, %room_id, "webhooks: payment job queued"),
                Err(err) => error!(%action, %room_id, error = %err, "webhooks: failed to queue payment job"),
            }
        }
        Ok(WebhookDisposition::Ignore(reason)) => {
            info!(%action, reason, "webhooks: delivery ignored");
        }
        Err(message) => {
            warn!(%action, %message, "webhooks: malformed payment data");
        }
    }

    Ok((StatusCode::OK, "OK"))
}
