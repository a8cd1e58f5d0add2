use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = room_gate::run().await {
        error!("room-gate exited with error: {:#}", error);
        std::process::exit(1);
    }
}
