pub mod access;
pub mod chat;
pub mod checkout;
pub mod creator_purchases;
pub mod purchases;
pub mod rooms;
pub mod webhooks;
