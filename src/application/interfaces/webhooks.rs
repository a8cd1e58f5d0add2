use anyhow::Result;
use mockall::automock;

#[automock]
pub trait WebhookVerifier: Send + Sync {
    /// Checks `signature_header` against the raw request body.
    fn verify(&self, payload: &[u8], signature_header: &str) -> Result<()>;
}
