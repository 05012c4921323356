use rust_decimal_macros::dec;
use rutina::application::flow::{FlowEvent, FlowState, PaymentFlow};
use rutina::domain::money::Amount;
use rutina::domain::payment::{PaymentRail, PaymentStatus};
use rutina::domain::ports::{PaymentApi, PaymentApiBox, RoutineApi, RoutineApiBox};
use rutina::domain::routine::{Routine, RoutineStatus};
use rutina::infrastructure::in_memory::InMemoryBackend;

async fn demo_backend() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    backend.seed_demo().await.unwrap();
    backend
}

fn flow_over(backend: &InMemoryBackend) -> PaymentFlow {
    let routines: RoutineApiBox = Box::new(backend.clone());
    let payments: PaymentApiBox = Box::new(backend.clone());
    PaymentFlow::new(routines, payments, Some(InMemoryBackend::DEMO_CLIENT))
}

async fn locked_demo_routine(backend: &InMemoryBackend) -> Routine {
    backend.routine(2).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_checkout_redirects_and_records_a_pending_payment() {
    let backend = demo_backend().await;
    let flow = flow_over(&backend);
    let routine = locked_demo_routine(&backend).await;

    flow.press(&routine).await;
    let event = flow.pay_by_checkout().await;

    let FlowEvent::Redirected { url } = event else {
        panic!("expected a redirect, got {:?}", event);
    };
    assert!(url.starts_with("https://"));
    assert_eq!(flow.state().await, FlowState::CheckoutRedirected { url });

    let pending = backend
        .payments(InMemoryBackend::DEMO_TRAINER, Some(PaymentStatus::Pending))
        .await
        .unwrap();
    assert!(pending.iter().any(|p| p.rail == PaymentRail::Checkout));
}

#[tokio::test]
async fn test_transfer_flow_end_to_end() {
    let backend = demo_backend().await;
    let flow = flow_over(&backend);
    let routine = locked_demo_routine(&backend).await;

    flow.press(&routine).await;

    // Bank details and payment id are captured before confirmation opens.
    let event = flow.pay_by_transfer().await;
    let FlowEvent::TransferPrepared { payment_id, bank } = event else {
        panic!("expected a prepared transfer, got {:?}", event);
    };
    assert_eq!(bank.alias, "entrenador.mp");
    assert_eq!(bank.cvu, "0000003100012345678901");
    assert!(matches!(
        flow.state().await,
        FlowState::AwaitingTransferConfirmation { payment_id: p, .. } if p == payment_id
    ));

    // "I already transferred" moves the payment to pending-verification and
    // re-fetches the routine instead of guessing the lock state locally.
    let event = flow.confirm_transfer().await;
    let FlowEvent::TransferConfirmed { routine: refreshed } = event else {
        panic!("expected a confirmed transfer, got {:?}", event);
    };
    let refreshed = refreshed.unwrap();
    assert_eq!(refreshed.status, RoutineStatus::PendingVerification);
    assert!(refreshed.status.is_locked());

    assert_eq!(
        backend.payment(payment_id).await.unwrap().status,
        PaymentStatus::PendingVerification
    );
    assert_eq!(
        flow.state().await,
        FlowState::TransferPendingVerification { payment_id }
    );
}

#[tokio::test]
async fn test_bank_details_failure_precedes_payment_creation() {
    // A backend with a routine but no bank details: the transfer rail must
    // fail on the first step and never create a payment record.
    let backend = InMemoryBackend::new();
    backend
        .insert_routine(Routine {
            id: 2,
            name: "Fuerza 5x5".to_string(),
            focus: "Fuerza".to_string(),
            start_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            status: RoutineStatus::PendingPayment,
            price: Amount::new(dec!(15000)).unwrap(),
            schedule: "1:Pecho".to_string(),
            client_id: 1,
            trainer_id: 7,
        })
        .await;

    let flow = flow_over(&backend);
    let routine = backend.routine(2).await.unwrap().unwrap();
    flow.press(&routine).await;

    assert_eq!(flow.pay_by_transfer().await, FlowEvent::Ignored);
    // Selector stays open for retry, and nothing was created server-side.
    assert!(matches!(
        flow.state().await,
        FlowState::AwaitingMethodChoice { .. }
    ));
    assert!(backend.payments(7, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_abandoning_the_dialog_leaves_the_payment_pending() {
    let backend = demo_backend().await;
    let flow = flow_over(&backend);
    let routine = locked_demo_routine(&backend).await;

    flow.press(&routine).await;
    let FlowEvent::TransferPrepared { payment_id, .. } = flow.pay_by_transfer().await else {
        panic!("transfer preparation failed");
    };

    flow.abandon().await;
    assert_eq!(flow.state().await, FlowState::NoPayment);

    // The orphaned record stays on the backend and the trainer sees it.
    let pending = backend
        .payments(InMemoryBackend::DEMO_TRAINER, Some(PaymentStatus::Pending))
        .await
        .unwrap();
    assert!(pending.iter().any(|p| p.id == payment_id));

    // Confirming after abandonment is a no-op: the identifier is gone.
    assert_eq!(flow.confirm_transfer().await, FlowEvent::Ignored);
    assert_eq!(
        backend.payment(payment_id).await.unwrap().status,
        PaymentStatus::Pending
    );
}
