use crate::domain::money::{Amount, Balance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Settlement state of a payment as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// `PENDIENTE`: created, nothing reported yet.
    #[serde(rename = "PENDIENTE")]
    Pending,
    /// `PENDIENTE_VERIFICACION`: the client says the transfer was sent,
    /// awaiting the trainer's decision.
    #[serde(rename = "PENDIENTE_VERIFICACION")]
    PendingVerification,
    #[serde(rename = "APROBADO")]
    Approved,
    #[serde(rename = "RECHAZADO")]
    Rejected,
}

impl PaymentStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Pending => "PENDIENTE",
            Self::PendingVerification => "PENDIENTE_VERIFICACION",
            Self::Approved => "APROBADO",
            Self::Rejected => "RECHAZADO",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_uppercase().as_str() {
            "PENDIENTE" => Ok(Self::Pending),
            "PENDIENTE_VERIFICACION" => Ok(Self::PendingVerification),
            "APROBADO" => Ok(Self::Approved),
            "RECHAZADO" => Ok(Self::Rejected),
            _ => Err(format!("unknown payment status '{}'", raw)),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// How a payment is (or was) settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentRail {
    /// Hosted checkout: the backend hands back a redirect URL and the
    /// provider drives the rest.
    #[serde(rename = "MERCADO_PAGO")]
    Checkout,
    /// Manual bank transfer, verified by the trainer.
    #[serde(rename = "TRANSFERENCIA")]
    Transfer,
}

impl fmt::Display for PaymentRail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkout => f.write_str("MERCADO_PAGO"),
            Self::Transfer => f.write_str("TRANSFERENCIA"),
        }
    }
}

/// One payment attempt for a routine. Created by the backend when a client
/// picks a rail; mutated only by backend-side effects of the flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: u32,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub client_id: u32,
    pub routine_id: u32,
    pub rail: PaymentRail,
    /// Receipt reference reported with a transfer, if any.
    #[serde(default)]
    pub receipt: Option<String>,
    /// Trainer-side notification bookkeeping.
    #[serde(default)]
    pub seen: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

/// A trainer's bank coordinates for the transfer rail. Read-only reference
/// data, fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub alias: String,
    pub cvu: String,
}

/// A hosted-checkout initiation: where to send the whole page next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

/// Per-trainer payment statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub pending: u64,
    pub pending_verification: u64,
    pub approved: u64,
    pub rejected: u64,
    /// Sum of all approved amounts.
    pub collected: Balance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_deserialization_defaults() {
        let json = r#"{
            "id": 9,
            "amount": 15000,
            "status": "PENDIENTE",
            "clientId": 1,
            "routineId": 3,
            "rail": "TRANSFERENCIA",
            "createdAt": "2026-08-06T12:00:00Z"
        }"#;

        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.rail, PaymentRail::Transfer);
        assert_eq!(payment.amount.value(), dec!(15000));
        assert_eq!(payment.receipt, None);
        assert!(!payment.seen);
        assert_eq!(payment.approved_at, None);
    }

    #[test]
    fn test_status_parses_from_cli_input() {
        assert_eq!(
            "pendiente_verificacion".parse::<PaymentStatus>().unwrap(),
            PaymentStatus::PendingVerification
        );
        assert_eq!(
            "APROBADO".parse::<PaymentStatus>().unwrap(),
            PaymentStatus::Approved
        );
        assert!("pagado".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_stats_deserialization() {
        let json = r#"{
            "pending": 1,
            "pendingVerification": 2,
            "approved": 3,
            "rejected": 0,
            "collected": 45000
        }"#;

        let stats: PaymentStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.pending_verification, 2);
        assert_eq!(stats.collected, Balance::new(dec!(45000)));
    }
}
