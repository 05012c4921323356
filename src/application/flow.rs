use crate::application::gate::{self, GateOutcome};
use crate::domain::payment::BankDetails;
use crate::domain::ports::{PaymentApiBox, PaymentId, RoutineApiBox};
use crate::domain::routine::Routine;
use crate::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Client-observed state of the payment-unlock workflow. Transitions are
/// effected server-side; this only tracks what the client has seen.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    /// Routine locked, no in-flight payment.
    NoPayment,
    /// The selector is open for this routine; either rail may be taken.
    AwaitingMethodChoice { routine: Routine },
    /// Hosted checkout started; the original UI leaves the page here.
    CheckoutRedirected { url: String },
    /// A transfer payment exists; waiting for the client to say it was sent.
    AwaitingTransferConfirmation {
        payment_id: PaymentId,
        bank: BankDetails,
        routine: Routine,
    },
    /// Transfer reported; the trainer's decision is out of scope.
    TransferPendingVerification { payment_id: PaymentId },
}

/// What a single flow action amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    SelectorOpened { routine_id: u32 },
    Navigated { routine_id: u32 },
    RoutineUnavailable,
    Redirected { url: String },
    TransferPrepared { payment_id: PaymentId, bank: BankDetails },
    /// Transfer reported as sent; carries the re-fetched routine snapshot so
    /// the caller can show the authoritative state.
    TransferConfirmed { routine: Option<Routine> },
    /// Nothing happened: busy, wrong state, missing identity, or a failure
    /// that was logged and absorbed. The previous state stands for retry.
    Ignored,
}

/// The payment-unlock workflow for one signed-in client.
///
/// One network call may be outstanding at a time: the busy flag is acquired
/// before a request starts, and every other action is ignored while it is
/// held. Failures are logged and absorbed; the state is left where it was so
/// the user can simply retry.
pub struct PaymentFlow {
    routines: RoutineApiBox,
    payments: PaymentApiBox,
    client_id: Option<u32>,
    state: Mutex<FlowState>,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl PaymentFlow {
    pub fn new(routines: RoutineApiBox, payments: PaymentApiBox, client_id: Option<u32>) -> Self {
        Self {
            routines,
            payments,
            client_id,
            state: Mutex::new(FlowState::NoPayment),
            busy: AtomicBool::new(false),
        }
    }

    pub async fn state(&self) -> FlowState {
        self.state.lock().await.clone()
    }

    /// Acquires the busy flag synchronously, before any request is issued.
    fn try_busy(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(&self.busy))
    }

    /// Presses a routine card: a locked routine opens the method selector,
    /// an open one navigates, anything else is unavailable.
    pub async fn press(&self, routine: &Routine) -> FlowEvent {
        match gate::press(routine) {
            GateOutcome::OpenPaymentSelector { routine_id, .. } => {
                *self.state.lock().await = FlowState::AwaitingMethodChoice {
                    routine: routine.clone(),
                };
                FlowEvent::SelectorOpened { routine_id }
            }
            GateOutcome::Navigate { routine_id } => FlowEvent::Navigated { routine_id },
            GateOutcome::Unavailable => FlowEvent::RoutineUnavailable,
        }
    }

    /// Hosted-checkout rail: asks the backend for a checkout session and
    /// records the redirect URL.
    pub async fn pay_by_checkout(&self) -> FlowEvent {
        let Some(client_id) = self.client_id else {
            debug!("no client identity in session, checkout ignored");
            return FlowEvent::Ignored;
        };
        let routine = {
            let state = self.state.lock().await;
            match &*state {
                FlowState::AwaitingMethodChoice { routine } => routine.clone(),
                _ => {
                    debug!("no routine selected, checkout ignored");
                    return FlowEvent::Ignored;
                }
            }
        };
        let Some(_busy) = self.try_busy() else {
            debug!("payment request already in flight, checkout press ignored");
            return FlowEvent::Ignored;
        };

        match self.payments.create_checkout(routine.id, client_id).await {
            Ok(session) => {
                *self.state.lock().await = FlowState::CheckoutRedirected {
                    url: session.url.clone(),
                };
                FlowEvent::Redirected { url: session.url }
            }
            Err(e) => {
                warn!(routine_id = routine.id, error = %e, "checkout initiation failed");
                FlowEvent::Ignored
            }
        }
    }

    /// Transfer rail: fetches the trainer's bank details, then creates the
    /// transfer payment, capturing its identifier. Strictly in that order;
    /// confirmation is only reachable once both succeeded.
    pub async fn pay_by_transfer(&self) -> FlowEvent {
        let Some(client_id) = self.client_id else {
            debug!("no client identity in session, transfer ignored");
            return FlowEvent::Ignored;
        };
        let routine = {
            let state = self.state.lock().await;
            match &*state {
                FlowState::AwaitingMethodChoice { routine } => routine.clone(),
                _ => {
                    debug!("no routine selected, transfer ignored");
                    return FlowEvent::Ignored;
                }
            }
        };
        let Some(_busy) = self.try_busy() else {
            debug!("payment request already in flight, transfer press ignored");
            return FlowEvent::Ignored;
        };

        let attempt = async {
            let bank = self.payments.bank_details(routine.trainer_id).await?;
            let payment_id = self.payments.create_transfer(routine.id, client_id).await?;
            Ok::<_, AppError>((bank, payment_id))
        }
        .await;

        match attempt {
            Ok((bank, payment_id)) => {
                *self.state.lock().await = FlowState::AwaitingTransferConfirmation {
                    payment_id,
                    bank: bank.clone(),
                    routine,
                };
                FlowEvent::TransferPrepared { payment_id, bank }
            }
            Err(e) => {
                warn!(routine_id = routine.id, error = %e, "transfer initiation failed");
                FlowEvent::Ignored
            }
        }
    }

    /// "I already transferred": marks the captured payment as sent, then
    /// re-fetches the routine so the caller observes the authoritative lock
    /// state instead of guessing it. A no-op unless a payment identifier was
    /// captured by a successful [`Self::pay_by_transfer`].
    pub async fn confirm_transfer(&self) -> FlowEvent {
        let (payment_id, routine_id) = {
            let state = self.state.lock().await;
            match &*state {
                FlowState::AwaitingTransferConfirmation {
                    payment_id,
                    routine,
                    ..
                } => (*payment_id, routine.id),
                _ => {
                    debug!("no transfer payment captured, confirm ignored");
                    return FlowEvent::Ignored;
                }
            }
        };
        let Some(_busy) = self.try_busy() else {
            debug!("payment request already in flight, confirm press ignored");
            return FlowEvent::Ignored;
        };

        match self.payments.confirm_transfer(payment_id).await {
            Ok(()) => {
                let refreshed = match self.routines.routine(routine_id).await {
                    Ok(routine) => routine,
                    Err(e) => {
                        warn!(routine_id, error = %e, "routine refresh after confirmation failed");
                        None
                    }
                };
                *self.state.lock().await =
                    FlowState::TransferPendingVerification { payment_id };
                FlowEvent::TransferConfirmed { routine: refreshed }
            }
            Err(e) => {
                warn!(payment_id, error = %e, "transfer confirmation failed");
                FlowEvent::Ignored
            }
        }
    }

    /// Closes whatever dialog is open. A transfer payment already created on
    /// the backend is left there, pending; the trainer sees it in the list.
    pub async fn abandon(&self) {
        let mut state = self.state.lock().await;
        if let FlowState::AwaitingTransferConfirmation { payment_id, .. } = &*state {
            debug!(payment_id = *payment_id, "abandoning flow, payment stays pending on the backend");
        }
        *state = FlowState::NoPayment;
    }
}
