pub mod messages;
pub mod purchases;
pub mod rooms;
pub mod users;
