pub mod media;
pub mod payouts;
pub mod webhooks;
