use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    ToConfirm,
    Authorized,
    Failed,
    Canceled,
    Refunded,
    Abandoned,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::ToConfirm => "TO_CONFIRM",
            PaymentStatus::Authorized => "AUTHORIZED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Canceled => "CANCELED",
            PaymentStatus::Refunded => "REFUNDED",
            PaymentStatus::Abandoned => "ABANDONED",
        }
    }

    pub fn parse(raw: &str) -> Option<PaymentStatus> {
        match raw {
            "PENDING" => Some(PaymentStatus::Pending),
            "TO_CONFIRM" => Some(PaymentStatus::ToConfirm),
            "AUTHORIZED" => Some(PaymentStatus::Authorized),
            "FAILED" => Some(PaymentStatus::Failed),
            "CANCELED" => Some(PaymentStatus::Canceled),
            "REFUNDED" => Some(PaymentStatus::Refunded),
            "ABANDONED" => Some(PaymentStatus::Abandoned),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending | PaymentStatus::ToConfirm)
    }
}

#[derive(Debug, Clone)]
pub struct PaymentRow {
    pub id: i64,
    pub provider: String,
    pub token: Option<String>,
    pub status: PaymentStatus,
    pub amount_minor: i64,
    pub context: Option<serde_json::Value>,
    pub product_id: Option<i64>,
    pub authorization_code: Option<String>,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub prior_checks: i64,
}
