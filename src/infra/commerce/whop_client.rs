use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use sha2::Sha256;
use tracing::{error, info};

use crate::{
    application::interfaces::{payouts::PlatformPayout, webhooks::WebhookVerifier},
    config::config_model::Whop,
    domain::value_objects::fees::to_major_units,
};

type HmacSha256 = Hmac<Sha256>;

/// Signatures older or newer than this are rejected.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 5 * 60;

/// Minimal Whop client built on reqwest.
pub struct WhopClient {
    http: reqwest::Client,
    config: Whop,
}

/// `amount` is in major units, matching `final_amount` on webhooks.
#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    amount: f64,
    currency: &'a str,
    destination_id: &'a str,
}

impl WhopClient {
    pub fn new(config: Whop) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        error!(
            status = %status,
            whop_request_id = ?request_id,
            response_body = %body,
            context = %context,
            "whop api request failed"
        );

        bail!(
            "Whop API request failed: {} (status {}, request_id={:?})",
            context,
            status,
            request_id
        );
    }
}

#[async_trait]
impl PlatformPayout for WhopClient {
    async fn payout(&self, amount: i64, currency: String) -> Result<()> {
        let url = format!("{}/transfers", self.config.api_base_url.trim_end_matches('/'));
        let body = TransferRequest {
            amount: to_major_units(amount),
            currency: &currency,
            destination_id: &self.config.platform_account_id,
        };

        let resp = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(resp, "platform transfer").await?;

        info!(amount, %currency, "whop: platform transfer created");
        Ok(())
    }
}

/// Verifies `x-whop-signature: t=<unix>,v1=<hex>` over `"{t}.{body}"`.
pub struct WhopWebhookVerifier {
    secret: String,
}

impl WhopWebhookVerifier {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub fn sign(&self, payload: &[u8], timestamp: i64) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes())))
    }

    fn verify_at(&self, payload: &[u8], signature_header: &str, now: i64) -> Result<()> {
        let mut timestamp: Option<&str> = None;
        let mut signature: Option<&str> = None;

        for part in signature_header.split(',') {
            let part = part.trim();
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest);
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest);
            }
        }

        let timestamp = timestamp.ok_or_else(|| anyhow!("missing timestamp in webhook signature"))?;
        let signature = signature.ok_or_else(|| anyhow!("missing v1 in webhook signature"))?;

        let issued_at: i64 = timestamp
            .parse()
            .map_err(|_| anyhow!("invalid timestamp in webhook signature"))?;
        if (now - issued_at).abs() > SIGNATURE_TOLERANCE_SECS {
            bail!("webhook signature timestamp outside tolerance");
        }

        let provided = hex::decode(signature)?;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.verify_slice(&provided)
            .map_err(|_| anyhow!("invalid webhook signature"))
    }
}

impl WebhookVerifier for WhopWebhookVerifier {
    fn verify(&self, payload: &[u8], signature_header: &str) -> Result<()> {
        self.verify_at(payload, signature_header, Utc::now().timestamp())
    }
}
