use std::sync::Arc;

use anyhow::{Result, anyhow};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use crate::{
    application::{
        interfaces::payouts::PlatformPayout, usecases::payment_webhook::PaymentWebhookUseCase,
    },
    domain::{
        repositories::{
            purchases::PurchaseRepository, rooms::RoomRepository, users::UserRepository,
        },
        value_objects::webhook::PaymentJob,
    },
};

/// Sending half of the in-process payment queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PaymentJobQueue {
    sender: UnboundedSender<PaymentJob>,
}

impl PaymentJobQueue {
    pub fn new() -> (Self, UnboundedReceiver<PaymentJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Never waits for the job to run.
    pub fn enqueue(&self, job: PaymentJob) -> Result<()> {
        self.sender
            .send(job)
            .map_err(|_| anyhow!("payment worker is not running"))
    }
}

/// Drains the queue until every sender is dropped. Job failures are logged
/// and never stop the loop.
pub async fn run_payment_worker<U, R, P, Pay>(
    mut jobs: UnboundedReceiver<PaymentJob>,
    usecase: Arc<PaymentWebhookUseCase<U, R, P, Pay>>,
) where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
    Pay: PlatformPayout + Send + Sync + 'static,
{
    info!("payment_worker: waiting for jobs");

    while let Some(job) = jobs.recv().await {
        let room_id = job.room_id;
        let payment_id = job.payment_id.clone().unwrap_or_else(|| "-".to_string());

        match usecase.process(job).await {
            Ok(outcome) => {
                info!(%room_id, %payment_id, ?outcome, "payment_worker: job finished");
            }
            Err(err) => {
                error!(
                    %room_id,
                    %payment_id,
                    status = err.status_code().as_u16(),
                    error = %err,
                    "payment_worker: job failed"
                );
            }
        }
    }

    info!("payment_worker: queue closed");
}
