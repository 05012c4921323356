use crate::domain::payment::{Payment, PaymentStats, PaymentStatus};
use crate::domain::ports::{PaymentApiBox, PaymentId};
use crate::error::Result;
use tracing::debug;

/// Trainer-side payment review: listing, statistics, settlement and
/// notification bookkeeping.
///
/// The trainer identity comes from the session, injected once at
/// construction. Without it, listing operations degrade to silent empties,
/// the same way the original degrades without a stored token.
pub struct ReviewDesk {
    payments: PaymentApiBox,
    trainer_id: Option<u32>,
}

impl ReviewDesk {
    pub fn new(payments: PaymentApiBox, trainer_id: Option<u32>) -> Self {
        Self {
            payments,
            trainer_id,
        }
    }

    /// The trainer's payments, optionally filtered by status.
    pub async fn payments(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>> {
        let Some(trainer_id) = self.trainer_id else {
            debug!("no trainer identity in session, payment listing skipped");
            return Ok(Vec::new());
        };
        self.payments.payments(trainer_id, status).await
    }

    pub async fn stats(&self) -> Result<Option<PaymentStats>> {
        let Some(trainer_id) = self.trainer_id else {
            debug!("no trainer identity in session, stats skipped");
            return Ok(None);
        };
        Ok(Some(self.payments.stats(trainer_id).await?))
    }

    /// Approves a reported transfer. The backend unlocks the routine as a
    /// side effect; callers re-fetch to observe it.
    pub async fn approve(&self, payment_id: PaymentId) -> Result<Payment> {
        self.payments.approve(payment_id).await
    }

    /// Rejects a reported transfer; the routine stays locked.
    pub async fn reject(&self, payment_id: PaymentId) -> Result<Payment> {
        self.payments.reject(payment_id).await
    }

    pub async fn mark_seen(&self, payment_id: PaymentId) -> Result<()> {
        self.payments.mark_seen(payment_id).await
    }
}
