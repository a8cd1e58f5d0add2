use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::value_objects::{
    fees::to_minor_units,
    purchases::{DEFAULT_CURRENCY, RecordPaymentModel},
};

pub const PAYMENT_SUCCEEDED: &str = "payment.succeeded";

#[derive(Debug, Clone, Deserialize)]
pub struct WhopWebhookEnvelope {
    pub action: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentSucceededData {
    pub id: Option<String>,
    pub final_amount: Option<f64>,
    pub currency: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

/// Work item handed from the webhook handler to the payment worker.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentJob {
    pub payment_id: Option<String>,
    pub external_user_id: String,
    pub email: Option<String>,
    pub room_id: Uuid,
    pub amount: i64,
    pub currency: String,
}

impl PaymentJob {
    pub fn to_record_model(&self) -> RecordPaymentModel {
        RecordPaymentModel {
            external_user_id: self.external_user_id.clone(),
            email: self.email.clone(),
            room_id: self.room_id,
            amount: self.amount,
            currency: self.currency.clone(),
            payment_id: self.payment_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebhookDisposition {
    Enqueue(PaymentJob),
    Ignore(&'static str),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl WhopWebhookEnvelope {
    /// Decides what a verified webhook delivery should do. `Err` means the
    /// payment data was present but malformed.
    pub fn into_disposition(self) -> Result<WebhookDisposition, String> {
        if self.action != PAYMENT_SUCCEEDED {
            return Ok(WebhookDisposition::Ignore("unhandled action"));
        }

        let data: PaymentSucceededData = serde_json::from_value(self.data)
            .map_err(|e| format!("invalid payment data: {e}"))?;

        let Some(external_user_id) = non_blank(data.user_id) else {
            return Ok(WebhookDisposition::Ignore("missing user_id"));
        };

        let room_hint = data
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.get("room_id"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let Some(room_hint) = room_hint else {
            return Ok(WebhookDisposition::Ignore("missing metadata.room_id"));
        };
        let room_id = Uuid::parse_str(room_hint)
            .map_err(|_| format!("metadata.room_id is not a uuid: {room_hint}"))?;

        let final_amount = data
            .final_amount
            .ok_or_else(|| "final_amount is missing".to_string())?;
        let amount = to_minor_units(final_amount)
            .ok_or_else(|| format!("final_amount is not a payable amount: {final_amount}"))?;

        let currency = non_blank(data.currency)
            .map(|c| c.to_lowercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(WebhookDisposition::Enqueue(PaymentJob {
            payment_id: non_blank(data.id),
            external_user_id,
            email: non_blank(data.email),
            room_id,
            amount,
            currency,
        }))
    }
}
