mod common;

use std::sync::Arc;

use common::{Harness, RecordingPayout};
use room_gate::{
    application::{errors::UseCaseError, usecases::payment_webhook::PaymentJobOutcome},
    background_worker::payment_worker::{PaymentJobQueue, run_payment_worker},
    domain::value_objects::{
        enums::purchase_statuses::PurchaseStatus,
        purchases::{RecordOutcome, RecordPaymentModel},
        webhook::PaymentJob,
    },
};
use uuid::Uuid;

fn job(room_id: Uuid, external_user_id: &str, amount: i64, payment_id: &str) -> PaymentJob {
    PaymentJob {
        payment_id: Some(payment_id.to_string()),
        external_user_id: external_user_id.to_string(),
        email: Some("buyer@example.com".to_string()),
        room_id,
        amount,
        currency: "usd".to_string(),
    }
}

#[tokio::test]
async fn paid_entitlement_opens_room_until_revoked() {
    let harness = Harness::new();
    let (creator_id, room) = harness.seed_room("creator_1", 0.5).await;

    let outcome = harness
        .processor
        .process(job(room.id, "buyer_1", 50, "P1"))
        .await
        .unwrap();
    let PaymentJobOutcome::Completed(purchase_id) = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };

    let purchase = harness.purchases.all().into_iter().next().unwrap();
    assert_eq!(purchase.id, purchase_id);
    assert_eq!(purchase.status, "completed");
    assert_eq!(purchase.platform_fee, 10);
    assert_eq!(purchase.creator_share, 40);
    assert!(purchase.password.len() >= 8);
    assert!(purchase.password.chars().all(|c| c.is_ascii_hexdigit()));

    assert_eq!(harness.payout.call_count(), 1);
    assert_eq!(
        harness.payout.paid.get(&0).map(|paid| paid.value().clone()),
        Some((10, "usd".to_string()))
    );

    let matched = harness
        .ledger
        .validate(room.id, &purchase.password)
        .await
        .unwrap();
    assert_eq!(matched, purchase_id);

    harness.ledger.revoke(purchase_id, creator_id).await.unwrap();

    let err = harness
        .ledger
        .validate(room.id, &purchase.password)
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::InvalidCredentials));
}

#[tokio::test]
async fn record_payment_is_idempotent_by_payment_id() {
    let harness = Harness::new();
    let (_, room) = harness.seed_room("creator_1", 1.0).await;

    let model = RecordPaymentModel {
        external_user_id: "buyer_1".to_string(),
        email: None,
        room_id: room.id,
        amount: 100,
        currency: "usd".to_string(),
        payment_id: Some("P1".to_string()),
    };

    let first = harness.ledger.record_payment(model.clone()).await.unwrap();
    assert_eq!(first.outcome, RecordOutcome::Created);
    let before = harness.purchases.all();

    let second = harness.ledger.record_payment(model).await.unwrap();
    assert_eq!(second.purchase_id, first.purchase_id);
    assert_eq!(
        second.outcome,
        RecordOutcome::AlreadyRecorded(PurchaseStatus::Processing)
    );

    let after = harness.purchases.all();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].password, before[0].password);
    assert_eq!(after[0].access_token, before[0].access_token);
}

#[tokio::test]
async fn duplicate_deliveries_through_worker_complete_once() {
    let harness = Harness::new();
    let (_, room) = harness.seed_room("creator_1", 1.0).await;

    let (queue, jobs) = PaymentJobQueue::new();
    let worker = tokio::spawn(run_payment_worker(jobs, Arc::clone(&harness.processor)));

    for _ in 0..3 {
        queue.enqueue(job(room.id, "buyer_1", 100, "P1")).unwrap();
    }
    drop(queue);
    worker.await.unwrap();

    let purchases = harness.purchases.all();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].status, "completed");
    assert_eq!(harness.payout.call_count(), 1);
}

#[tokio::test]
async fn replaying_an_older_payment_after_a_newer_one_is_a_duplicate() {
    let harness = Harness::new();
    let (_, room) = harness.seed_room("creator_1", 1.0).await;

    for payment_id in ["P1", "P2"] {
        let outcome = harness
            .processor
            .process(job(room.id, "buyer_1", 100, payment_id))
            .await
            .unwrap();
        assert!(matches!(outcome, PaymentJobOutcome::Completed(_)));
    }
    let before = harness.purchases.all();
    assert_eq!(before.len(), 1);

    let outcome = harness
        .processor
        .process(job(room.id, "buyer_1", 100, "P1"))
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        PaymentJobOutcome::Duplicate(purchase_id, PurchaseStatus::Completed)
            if purchase_id == before[0].id
    ));

    assert_eq!(harness.payout.call_count(), 2);
    let after = harness.purchases.all();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].password, before[0].password);
    assert_eq!(after[0].access_token, before[0].access_token);
    assert_eq!(after[0].payment_id.as_deref(), Some("P2"));
}

#[tokio::test]
async fn failed_payout_leaves_room_locked() {
    let harness = Harness::with_payout(RecordingPayout::failing());
    let (_, room) = harness.seed_room("creator_1", 1.0).await;

    let outcome = harness
        .processor
        .process(job(room.id, "buyer_1", 101, "P1"))
        .await
        .unwrap();
    assert!(matches!(outcome, PaymentJobOutcome::PayoutFailed(_)));

    let purchase = harness.purchases.all().into_iter().next().unwrap();
    assert_eq!(purchase.status, "failed");
    assert_eq!(purchase.platform_fee, 20);
    assert_eq!(purchase.creator_share, 81);

    let err = harness
        .ledger
        .validate(room.id, &purchase.password)
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::InvalidCredentials));
}

#[tokio::test]
async fn revoke_by_non_owner_is_forbidden_and_repeat_revoke_is_noop() {
    let harness = Harness::new();
    let (creator_id, room) = harness.seed_room("creator_1", 1.0).await;
    let stranger_id = harness.accounts.resolve("stranger", None).await.unwrap();

    let PaymentJobOutcome::Completed(purchase_id) = harness
        .processor
        .process(job(room.id, "buyer_1", 100, "P1"))
        .await
        .unwrap()
    else {
        panic!("payment should complete");
    };

    let err = harness
        .ledger
        .revoke(purchase_id, stranger_id)
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::Forbidden));

    harness.ledger.revoke(purchase_id, creator_id).await.unwrap();
    harness.ledger.revoke(purchase_id, creator_id).await.unwrap();

    let purchase = harness.purchases.all().into_iter().next().unwrap();
    assert!(purchase.revoked);
}

#[tokio::test]
async fn access_token_stops_resolving_after_revoke() {
    let harness = Harness::new();
    let (creator_id, room) = harness.seed_room("creator_1", 1.0).await;

    let PaymentJobOutcome::Completed(purchase_id) = harness
        .processor
        .process(job(room.id, "buyer_1", 100, "P1"))
        .await
        .unwrap()
    else {
        panic!("payment should complete");
    };
    let purchase = harness.purchases.all().into_iter().next().unwrap();

    let resolved = harness
        .ledger
        .resolve_by_token(&purchase.access_token)
        .await
        .unwrap();
    assert_eq!(resolved.room_id, room.id);
    assert_eq!(resolved.password, purchase.password);

    harness.ledger.revoke(purchase_id, creator_id).await.unwrap();

    let err = harness
        .ledger
        .resolve_by_token(&purchase.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, UseCaseError::NotFound(_)));
}

#[tokio::test]
async fn repurchase_keeps_revocation_and_creator_listing_shows_buyer() {
    let harness = Harness::new();
    let (creator_id, room) = harness.seed_room("creator_1", 1.0).await;

    let PaymentJobOutcome::Completed(purchase_id) = harness
        .processor
        .process(job(room.id, "buyer_1", 100, "P1"))
        .await
        .unwrap()
    else {
        panic!("payment should complete");
    };
    harness.ledger.revoke(purchase_id, creator_id).await.unwrap();

    harness
        .processor
        .process(job(room.id, "buyer_1", 100, "P2"))
        .await
        .unwrap();

    let listing = harness.ledger.list_for_creator(creator_id).await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id, purchase_id);
    assert!(listing[0].revoked);
    assert_eq!(listing[0].room_name, "Backstage");
    assert_eq!(listing[0].user_email.as_deref(), Some("buyer@example.com"));
}
