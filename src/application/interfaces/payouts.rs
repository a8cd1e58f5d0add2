use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// Moves the platform's share of a payment to the platform account.
#[automock]
#[async_trait]
pub trait PlatformPayout: Send + Sync {
    async fn payout(&self, amount: i64, currency: String) -> Result<()>;
}
