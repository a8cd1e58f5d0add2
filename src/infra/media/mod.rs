pub mod livekit_client;
