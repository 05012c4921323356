use rutina::application::gate::{self, GateOutcome};
use rutina::application::review::ReviewDesk;
use rutina::domain::payment::PaymentStatus;
use rutina::domain::ports::RoutineApi;
use rutina::infrastructure::in_memory::InMemoryBackend;

async fn demo_desk() -> (InMemoryBackend, ReviewDesk) {
    let backend = InMemoryBackend::new();
    backend.seed_demo().await.unwrap();
    let desk = ReviewDesk::new(
        Box::new(backend.clone()),
        Some(InMemoryBackend::DEMO_TRAINER),
    );
    (backend, desk)
}

#[tokio::test]
async fn test_approving_a_transfer_unlocks_the_routine() {
    let (backend, desk) = demo_desk().await;

    // Demo payment 1 is a reported transfer for routine 4.
    let before = backend.routine(4).await.unwrap().unwrap();
    assert!(matches!(gate::press(&before), GateOutcome::OpenPaymentSelector { .. }));

    let payment = desk.approve(1).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Approved);

    let after = backend.routine(4).await.unwrap().unwrap();
    assert_eq!(gate::press(&after), GateOutcome::Navigate { routine_id: 4 });
}

#[tokio::test]
async fn test_rejecting_a_transfer_keeps_the_routine_locked() {
    let (backend, desk) = demo_desk().await;

    let payment = desk.reject(1).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Rejected);

    let routine = backend.routine(4).await.unwrap().unwrap();
    assert!(matches!(
        gate::press(&routine),
        GateOutcome::OpenPaymentSelector { .. }
    ));
}

#[tokio::test]
async fn test_stats_reflect_settlement() {
    let (_backend, desk) = demo_desk().await;

    let before = desk.stats().await.unwrap().unwrap();
    assert_eq!(before.pending_verification, 1);
    assert_eq!(before.approved, 0);

    desk.approve(1).await.unwrap();

    let after = desk.stats().await.unwrap().unwrap();
    assert_eq!(after.pending_verification, 0);
    assert_eq!(after.approved, 1);
    assert!(after.collected > before.collected);
}

#[tokio::test]
async fn test_mark_seen_is_notification_bookkeeping_only() {
    let (backend, desk) = demo_desk().await;

    desk.mark_seen(1).await.unwrap();

    let payment = backend.payment(1).await.unwrap();
    assert!(payment.seen);
    // Seen is bookkeeping; the settlement state is untouched.
    assert_eq!(payment.status, PaymentStatus::PendingVerification);
}
