use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    Pending,
    Processed,
}

impl RefundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundStatus::Pending => "pending",
            RefundStatus::Processed => "processed",
        }
    }

    pub fn from_db(s: &str) -> RefundStatus {
        match s {
            "processed" => RefundStatus::Processed,
            _ => RefundStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Refund {
    pub id: String,
    pub payment_id: String,
    #[serde(skip_serializing)]
    pub merchant_id: Uuid,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: RefundStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRefundRequest {
    pub amount: i64,
    #[serde(default)]
    pub reason: Option<String>,
}
