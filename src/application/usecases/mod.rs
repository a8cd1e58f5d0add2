pub mod access_gate;
pub mod accounts;
pub mod authorization;
pub mod chat;
pub mod checkout;
pub mod payment_webhook;
pub mod purchase_ledger;
pub mod rooms;
