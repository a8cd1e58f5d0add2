pub mod whop_client;
