pub mod checkout;
pub mod credentials;
pub mod enums;
pub mod fees;
pub mod media;
pub mod messages;
pub mod purchases;
pub mod rooms;
pub mod webhook;
