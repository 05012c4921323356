use crate::domain::money::{Amount, Balance};
use crate::domain::payment::{
    BankDetails, CheckoutSession, Payment, PaymentRail, PaymentStats, PaymentStatus,
};
use crate::domain::ports::{PaymentApi, PaymentId, RoutineApi};
use crate::domain::routine::{Routine, RoutineStatus};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    routines: HashMap<u32, Routine>,
    payments: HashMap<PaymentId, Payment>,
    banks: HashMap<u32, BankDetails>,
    next_payment_id: PaymentId,
}

/// An in-memory stand-in for the backend, with the server-side effects the
/// client observes: transfer confirmation moves a payment to
/// pending-verification, approval unlocks the routine, rejection relocks it.
///
/// Used by the test suites and by the CLI's `--demo` mode. `Clone` shares
/// the underlying state.
#[derive(Default, Clone)]
pub struct InMemoryBackend {
    state: Arc<RwLock<State>>,
}

impl InMemoryBackend {
    pub const DEMO_CLIENT: u32 = 1;
    pub const DEMO_TRAINER: u32 = 7;

    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_routine(&self, routine: Routine) {
        let mut state = self.state.write().await;
        state.routines.insert(routine.id, routine);
    }

    pub async fn insert_bank_details(&self, trainer_id: u32, bank: BankDetails) {
        let mut state = self.state.write().await;
        state.banks.insert(trainer_id, bank);
    }

    pub async fn insert_payment(&self, payment: Payment) {
        let mut state = self.state.write().await;
        state.next_payment_id = state.next_payment_id.max(payment.id);
        state.payments.insert(payment.id, payment);
    }

    /// Direct lookup for assertions; not part of any port.
    pub async fn payment(&self, payment_id: PaymentId) -> Option<Payment> {
        self.state.read().await.payments.get(&payment_id).cloned()
    }

    /// Installs the demo dataset: one trainer with bank details, one client
    /// with an unlocked, a locked and a finished routine, plus a second
    /// client's transfer already awaiting verification.
    pub async fn seed_demo(&self) -> Result<()> {
        let trainer = Self::DEMO_TRAINER;
        let client = Self::DEMO_CLIENT;

        self.insert_bank_details(
            trainer,
            BankDetails {
                alias: "entrenador.mp".to_string(),
                cvu: "0000003100012345678901".to_string(),
            },
        )
        .await;

        self.insert_routine(Routine {
            id: 1,
            name: "Adaptacion".to_string(),
            focus: "General".to_string(),
            start_date: date(2026, 7, 1),
            end_date: date(2026, 7, 31),
            status: RoutineStatus::Active,
            price: Amount::new(dec!(12000))?,
            schedule: "1:Pecho;2:Espalda;3:Piernas".to_string(),
            client_id: client,
            trainer_id: trainer,
        })
        .await;

        self.insert_routine(Routine {
            id: 2,
            name: "Fuerza 5x5".to_string(),
            focus: "Fuerza".to_string(),
            start_date: date(2026, 8, 1),
            end_date: date(2026, 9, 30),
            status: RoutineStatus::PendingPayment,
            price: Amount::new(dec!(15000))?,
            schedule: "1:Pecho;2:Espalda;4:Piernas".to_string(),
            client_id: client,
            trainer_id: trainer,
        })
        .await;

        self.insert_routine(Routine {
            id: 3,
            name: "Hipertrofia".to_string(),
            focus: "Hipertrofia".to_string(),
            start_date: date(2026, 5, 1),
            end_date: date(2026, 6, 30),
            status: RoutineStatus::Finished,
            price: Amount::new(dec!(10000))?,
            schedule: "1:Hombros;3:Brazos".to_string(),
            client_id: client,
            trainer_id: trainer,
        })
        .await;

        self.insert_routine(Routine {
            id: 4,
            name: "Resistencia".to_string(),
            focus: "Cardio".to_string(),
            start_date: date(2026, 8, 1),
            end_date: date(2026, 8, 31),
            status: RoutineStatus::PendingVerification,
            price: Amount::new(dec!(9000))?,
            schedule: "2:Cardio;5:Cardio".to_string(),
            client_id: 2,
            trainer_id: trainer,
        })
        .await;

        self.insert_payment(Payment {
            id: 1,
            amount: Amount::new(dec!(9000))?,
            status: PaymentStatus::PendingVerification,
            client_id: 2,
            routine_id: 4,
            rail: PaymentRail::Transfer,
            receipt: None,
            seen: false,
            created_at: Utc::now(),
            approved_at: None,
        })
        .await;

        Ok(())
    }

    async fn create_payment(
        &self,
        routine_id: u32,
        client_id: u32,
        rail: PaymentRail,
    ) -> Result<Payment> {
        let mut state = self.state.write().await;
        let amount = state
            .routines
            .get(&routine_id)
            .map(|r| r.price)
            .ok_or_else(|| AppError::Validation(format!("routine {} not found", routine_id)))?;

        state.next_payment_id += 1;
        let payment = Payment {
            id: state.next_payment_id,
            amount,
            status: PaymentStatus::Pending,
            client_id,
            routine_id,
            rail,
            receipt: None,
            seen: false,
            created_at: Utc::now(),
            approved_at: None,
        };
        state.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    /// Payments belonging to this trainer's routines.
    fn trainer_payments(state: &State, trainer_id: u32) -> Vec<Payment> {
        let mut payments: Vec<Payment> = state
            .payments
            .values()
            .filter(|p| {
                state
                    .routines
                    .get(&p.routine_id)
                    .is_some_and(|r| r.trainer_id == trainer_id)
            })
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.id);
        payments
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[async_trait]
impl RoutineApi for InMemoryBackend {
    async fn routine(&self, routine_id: u32) -> Result<Option<Routine>> {
        Ok(self.state.read().await.routines.get(&routine_id).cloned())
    }

    async fn client_routines(&self, client_id: u32) -> Result<Vec<Routine>> {
        let state = self.state.read().await;
        let mut routines: Vec<Routine> = state
            .routines
            .values()
            .filter(|r| r.client_id == client_id)
            .cloned()
            .collect();
        routines.sort_by_key(|r| r.id);
        Ok(routines)
    }
}

#[async_trait]
impl PaymentApi for InMemoryBackend {
    async fn create_checkout(&self, routine_id: u32, client_id: u32) -> Result<CheckoutSession> {
        let payment = self
            .create_payment(routine_id, client_id, PaymentRail::Checkout)
            .await?;
        Ok(CheckoutSession {
            url: format!("https://checkout.example/pay/{}", payment.id),
        })
    }

    async fn bank_details(&self, trainer_id: u32) -> Result<BankDetails> {
        self.state
            .read()
            .await
            .banks
            .get(&trainer_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Validation(format!("no bank details for trainer {}", trainer_id))
            })
    }

    async fn create_transfer(&self, routine_id: u32, client_id: u32) -> Result<PaymentId> {
        let payment = self
            .create_payment(routine_id, client_id, PaymentRail::Transfer)
            .await?;
        Ok(payment.id)
    }

    async fn confirm_transfer(&self, payment_id: PaymentId) -> Result<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let payment = state
            .payments
            .get_mut(&payment_id)
            .ok_or_else(|| AppError::Validation(format!("payment {} not found", payment_id)))?;

        if payment.status == PaymentStatus::Pending {
            payment.status = PaymentStatus::PendingVerification;
            if let Some(routine) = state.routines.get_mut(&payment.routine_id)
                && routine.status == RoutineStatus::PendingPayment
            {
                routine.status = RoutineStatus::PendingVerification;
            }
        }
        Ok(())
    }

    async fn mark_seen(&self, payment_id: PaymentId) -> Result<()> {
        let mut state = self.state.write().await;
        let payment = state
            .payments
            .get_mut(&payment_id)
            .ok_or_else(|| AppError::Validation(format!("payment {} not found", payment_id)))?;
        payment.seen = true;
        Ok(())
    }

    async fn payments(
        &self,
        trainer_id: u32,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>> {
        let state = self.state.read().await;
        let mut payments = Self::trainer_payments(&state, trainer_id);
        if let Some(status) = status {
            payments.retain(|p| p.status == status);
        }
        Ok(payments)
    }

    async fn stats(&self, trainer_id: u32) -> Result<PaymentStats> {
        let state = self.state.read().await;
        let mut stats = PaymentStats {
            pending: 0,
            pending_verification: 0,
            approved: 0,
            rejected: 0,
            collected: Balance::ZERO,
        };
        for payment in Self::trainer_payments(&state, trainer_id) {
            match payment.status {
                PaymentStatus::Pending => stats.pending += 1,
                PaymentStatus::PendingVerification => stats.pending_verification += 1,
                PaymentStatus::Approved => {
                    stats.approved += 1;
                    stats.collected += payment.amount;
                }
                PaymentStatus::Rejected => stats.rejected += 1,
            }
        }
        Ok(stats)
    }

    async fn approve(&self, payment_id: PaymentId) -> Result<Payment> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let payment = state
            .payments
            .get_mut(&payment_id)
            .ok_or_else(|| AppError::Validation(format!("payment {} not found", payment_id)))?;
        if matches!(
            payment.status,
            PaymentStatus::Approved | PaymentStatus::Rejected
        ) {
            return Err(AppError::Validation(format!(
                "payment {} already settled",
                payment_id
            )));
        }

        payment.status = PaymentStatus::Approved;
        payment.approved_at = Some(Utc::now());
        if let Some(routine) = state.routines.get_mut(&payment.routine_id) {
            routine.status = RoutineStatus::Active;
        }
        Ok(payment.clone())
    }

    async fn reject(&self, payment_id: PaymentId) -> Result<Payment> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let payment = state
            .payments
            .get_mut(&payment_id)
            .ok_or_else(|| AppError::Validation(format!("payment {} not found", payment_id)))?;
        if matches!(
            payment.status,
            PaymentStatus::Approved | PaymentStatus::Rejected
        ) {
            return Err(AppError::Validation(format!(
                "payment {} already settled",
                payment_id
            )));
        }

        payment.status = PaymentStatus::Rejected;
        if let Some(routine) = state.routines.get_mut(&payment.routine_id)
            && routine.status.is_locked()
        {
            routine.status = RoutineStatus::PendingPayment;
        }
        Ok(payment.clone())
    }
}
