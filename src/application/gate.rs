use crate::domain::money::Amount;
use crate::domain::routine::Routine;

/// What pressing a routine card leads to.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// The routine is behind the payment gate; offer the payment rails.
    OpenPaymentSelector { routine_id: u32, amount: Amount },
    /// The routine is accessible; go straight to its detail view.
    Navigate { routine_id: u32 },
    /// Cancelled or otherwise inaccessible; neither pay nor navigate.
    Unavailable,
}

/// Classifies a pressed routine. Pure: no side effects, no error conditions,
/// just a decision over an already-fetched snapshot.
pub fn press(routine: &Routine) -> GateOutcome {
    if routine.status.is_locked() {
        GateOutcome::OpenPaymentSelector {
            routine_id: routine.id,
            amount: routine.price,
        }
    } else if routine.status.is_open() {
        GateOutcome::Navigate {
            routine_id: routine.id,
        }
    } else {
        GateOutcome::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::routine::RoutineStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn routine_with_status(status: &str) -> Routine {
        Routine {
            id: 3,
            name: "Fuerza 5x5".to_string(),
            focus: "Fuerza".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            status: RoutineStatus::from(status.to_string()),
            price: Amount::new(dec!(15000)).unwrap(),
            schedule: "1:Pecho;2:Espalda".to_string(),
            client_id: 1,
            trainer_id: 7,
        }
    }

    #[test]
    fn test_pending_payment_family_opens_selector() {
        for status in [
            "PENDIENTE_PAGO",
            "PENDIENTE_PAGO_VERIFICACION",
            "PENDIENTE_PAGO_EFECTIVO",
        ] {
            let outcome = press(&routine_with_status(status));
            assert!(
                matches!(outcome, GateOutcome::OpenPaymentSelector { routine_id: 3, .. }),
                "status {} should open the selector",
                status
            );
        }
    }

    #[test]
    fn test_open_statuses_navigate() {
        for status in ["ACTIVA", "FINALIZADA"] {
            let outcome = press(&routine_with_status(status));
            assert_eq!(outcome, GateOutcome::Navigate { routine_id: 3 });
        }
    }

    #[test]
    fn test_cancelled_and_unknown_are_unavailable() {
        assert_eq!(press(&routine_with_status("CANCELADA")), GateOutcome::Unavailable);
        assert_eq!(press(&routine_with_status("EN_REVISION")), GateOutcome::Unavailable);
    }

    #[test]
    fn test_selector_carries_the_amount_due() {
        let outcome = press(&routine_with_status("PENDIENTE_PAGO"));
        match outcome {
            GateOutcome::OpenPaymentSelector { amount, .. } => {
                assert_eq!(amount.value(), dec!(15000));
            }
            other => panic!("expected selector, got {:?}", other),
        }
    }
}
