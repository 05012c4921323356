use crate::domain::payment::{BankDetails, CheckoutSession, Payment, PaymentStats, PaymentStatus};
use crate::domain::routine::Routine;
use crate::error::Result;
use async_trait::async_trait;

pub type PaymentId = u32;

/// Read access to routine snapshots. The backend owns the authoritative
/// state; callers re-fetch instead of mutating locally.
#[async_trait]
pub trait RoutineApi: Send + Sync {
    async fn routine(&self, routine_id: u32) -> Result<Option<Routine>>;
    async fn client_routines(&self, client_id: u32) -> Result<Vec<Routine>>;
}

/// The payment operations of the backend, both client-facing (initiate and
/// confirm) and trainer-facing (review and settle).
#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Initiates a hosted-checkout payment; the caller redirects to the URL.
    async fn create_checkout(&self, routine_id: u32, client_id: u32) -> Result<CheckoutSession>;

    /// The trainer's bank coordinates for the transfer rail.
    async fn bank_details(&self, trainer_id: u32) -> Result<BankDetails>;

    /// Creates a transfer payment record and returns its identifier.
    async fn create_transfer(&self, routine_id: u32, client_id: u32) -> Result<PaymentId>;

    /// Marks a transfer payment as sent by the client.
    async fn confirm_transfer(&self, payment_id: PaymentId) -> Result<()>;

    /// Notification bookkeeping: the trainer has seen this payment.
    async fn mark_seen(&self, payment_id: PaymentId) -> Result<()>;

    /// The trainer's payments, optionally filtered by status.
    async fn payments(
        &self,
        trainer_id: u32,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>>;

    async fn stats(&self, trainer_id: u32) -> Result<PaymentStats>;

    /// Settles a reported transfer; the backend unlocks the routine.
    async fn approve(&self, payment_id: PaymentId) -> Result<Payment>;

    /// Rejects a reported transfer; the routine stays locked.
    async fn reject(&self, payment_id: PaymentId) -> Result<Payment>;
}

pub type RoutineApiBox = Box<dyn RoutineApi>;
pub type PaymentApiBox = Box<dyn PaymentApi>;
