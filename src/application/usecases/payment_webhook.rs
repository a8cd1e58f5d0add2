use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        errors::UseCaseResult, interfaces::payouts::PlatformPayout,
        usecases::purchase_ledger::PurchaseLedgerUseCase,
    },
    domain::{
        repositories::{
            purchases::PurchaseRepository, rooms::RoomRepository, users::UserRepository,
        },
        value_objects::{
            enums::purchase_statuses::PurchaseStatus, purchases::RecordOutcome,
            webhook::PaymentJob,
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentJobOutcome {
    Completed(Uuid),
    Duplicate(Uuid, PurchaseStatus),
    PayoutFailed(Uuid),
}

/// Drives one verified payment to a terminal ledger state.
pub struct PaymentWebhookUseCase<U, R, P, Pay>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
    Pay: PlatformPayout + Send + Sync + 'static,
{
    ledger: Arc<PurchaseLedgerUseCase<U, R, P>>,
    payout: Arc<Pay>,
}

impl<U, R, P, Pay> PaymentWebhookUseCase<U, R, P, Pay>
where
    U: UserRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    P: PurchaseRepository + Send + Sync + 'static,
    Pay: PlatformPayout + Send + Sync + 'static,
{
    pub fn new(ledger: Arc<PurchaseLedgerUseCase<U, R, P>>, payout: Arc<Pay>) -> Self {
        Self { ledger, payout }
    }

    pub async fn process(&self, job: PaymentJob) -> UseCaseResult<PaymentJobOutcome> {
        info!(
            payment_id = job.payment_id.as_deref().unwrap_or("-"),
            external_user_id = %job.external_user_id,
            room_id = %job.room_id,
            amount = job.amount,
            currency = %job.currency,
            "payment_webhook: processing payment"
        );

        let recorded = self.ledger.record_payment(job.to_record_model()).await?;
        let purchase_id = recorded.purchase_id;

        if let RecordOutcome::AlreadyRecorded(status) = recorded.outcome {
            info!(%purchase_id, %status, "payment_webhook: duplicate delivery skipped");
            return Ok(PaymentJobOutcome::Duplicate(purchase_id, status));
        }

        if recorded.platform_fee > 0 {
            if let Err(err) = self
                .payout
                .payout(recorded.platform_fee, recorded.currency.clone())
                .await
            {
                error!(
                    %purchase_id,
                    platform_fee = recorded.platform_fee,
                    currency = %recorded.currency,
                    error = ?err,
                    "payment_webhook: platform payout failed"
                );
                self.ledger.mark_failed(purchase_id).await?;
                return Ok(PaymentJobOutcome::PayoutFailed(purchase_id));
            }
        } else {
            warn!(%purchase_id, "payment_webhook: zero platform fee, payout skipped");
        }

        self.ledger.mark_completed(purchase_id).await?;
        info!(%purchase_id, "payment_webhook: purchase completed");
        Ok(PaymentJobOutcome::Completed(purchase_id))
    }
}
