use crate::domain::money::Amount;
use crate::domain::schedule::{self, ScheduleEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire marker shared by every status in the pending-payment family.
const PENDING_PAYMENT_MARKER: &str = "PENDIENTE_PAGO";

/// Lifecycle status of a routine as reported by the backend.
///
/// The wire values are the backend's uppercase tokens. Unrecognized tokens
/// are preserved verbatim so a snapshot can round-trip through the client
/// untouched; classification only cares about the pending-payment marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoutineStatus {
    /// `PENDIENTE_PAGO`: created, no settled payment yet.
    PendingPayment,
    /// `PENDIENTE_PAGO_VERIFICACION`: a transfer was reported, the trainer
    /// has not verified it yet.
    PendingVerification,
    /// `ACTIVA`
    Active,
    /// `FINALIZADA`
    Finished,
    /// `CANCELADA`
    Cancelled,
    /// Any token this client version does not know.
    Other(String),
}

impl RoutineStatus {
    /// Whether the routine content is still behind the payment gate.
    pub fn is_locked(&self) -> bool {
        match self {
            Self::PendingPayment | Self::PendingVerification => true,
            Self::Other(raw) => raw.contains(PENDING_PAYMENT_MARKER),
            _ => false,
        }
    }

    /// Whether the routine content is navigable. Exactly active and finished
    /// routines are; a cancelled routine is neither locked nor open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Active | Self::Finished)
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::PendingPayment => "PENDIENTE_PAGO",
            Self::PendingVerification => "PENDIENTE_PAGO_VERIFICACION",
            Self::Active => "ACTIVA",
            Self::Finished => "FINALIZADA",
            Self::Cancelled => "CANCELADA",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for RoutineStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDIENTE_PAGO" => Self::PendingPayment,
            "PENDIENTE_PAGO_VERIFICACION" => Self::PendingVerification,
            "ACTIVA" => Self::Active,
            "FINALIZADA" => Self::Finished,
            "CANCELADA" => Self::Cancelled,
            _ => Self::Other(raw),
        }
    }
}

impl From<RoutineStatus> for String {
    fn from(status: RoutineStatus) -> Self {
        status.as_wire().to_string()
    }
}

impl fmt::Display for RoutineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A trainer-authored training plan assigned to one client.
///
/// The client only ever holds a read-only snapshot of this; every state
/// change happens on the backend and is observed by re-fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: u32,
    pub name: String,
    /// Focus category, e.g. strength or hypertrophy.
    pub focus: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: RoutineStatus,
    pub price: Amount,
    /// Delimited day schedule, see [`crate::domain::schedule`].
    pub schedule: String,
    pub client_id: u32,
    pub trainer_id: u32,
}

impl Routine {
    /// The parsed day/muscle entries of the schedule string.
    pub fn schedule_entries(&self) -> Vec<ScheduleEntry> {
        schedule::parse(&self.schedule)
    }
}
