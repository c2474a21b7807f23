use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::domain::refund::{Refund, RefundStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

pub const EVENT_PAYMENT_SUCCESS: &str = "payment.success";
pub const EVENT_PAYMENT_FAILED: &str = "payment.failed";
pub const EVENT_REFUND_PROCESSED: &str = "refund.processed";
pub const EVENT_TEST_WEBHOOK: &str = "test.webhook";

pub const MAX_DELIVERY_ATTEMPTS: i32 = 5;
pub const DELIVERY_TIMEOUT_SECS: u64 = 5;
pub const RESPONSE_BODY_LIMIT: usize = 1000;

// Delay before attempt N, indexed by N-1. Attempt 1 is scheduled immediately
// on fan-out.
const BACKOFF_MS: [u64; 5] = [0, 60_000, 300_000, 1_800_000, 7_200_000];
const BACKOFF_TEST_MS: [u64; 5] = [0, 5_000, 10_000, 15_000, 20_000];

pub fn backoff_ms(next_attempt: i32, test_intervals: bool) -> Option<u64> {
    if next_attempt < 1 || next_attempt > MAX_DELIVERY_ATTEMPTS {
        return None;
    }
    let table = if test_intervals { &BACKOFF_TEST_MS } else { &BACKOFF_MS };
    Some(table[(next_attempt - 1) as usize])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryDisposition {
    Delivered,
    RetryScheduled { next_attempt: i32, delay_ms: u64 },
    Exhausted,
}

/// Decides what happens to a webhook log after an attempt has been made and
/// counted. `attempts_done` is the attempt counter including the attempt that
/// just finished.
pub fn after_attempt(attempts_done: i32, delivered: bool, test_intervals: bool) -> DeliveryDisposition {
    if delivered {
        return DeliveryDisposition::Delivered;
    }
    if attempts_done >= MAX_DELIVERY_ATTEMPTS {
        return DeliveryDisposition::Exhausted;
    }
    let next_attempt = attempts_done + 1;
    match backoff_ms(next_attempt, test_intervals) {
        Some(delay_ms) => DeliveryDisposition::RetryScheduled { next_attempt, delay_ms },
        None => DeliveryDisposition::Exhausted,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    Pending,
    Success,
    Failed,
}

impl WebhookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookStatus::Pending => "pending",
            WebhookStatus::Success => "success",
            WebhookStatus::Failed => "failed",
        }
    }

    pub fn from_db(s: &str) -> WebhookStatus {
        match s {
            "success" => WebhookStatus::Success,
            "failed" => WebhookStatus::Failed,
            _ => WebhookStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookLog {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub merchant_id: Uuid,
    pub event: String,
    pub payload: serde_json::Value,
    pub status: WebhookStatus,
    pub attempts: i32,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub response_code: Option<i32>,
    pub response_body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The wire shape of every webhook body. Serialized exactly once per attempt;
/// the signature covers those exact bytes.
#[derive(Debug, Serialize)]
pub struct WebhookEnvelope<'a> {
    pub event: &'a str,
    pub timestamp: i64,
    pub data: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
struct PaymentEventData<'a> {
    id: &'a str,
    order_id: &'a str,
    amount: i64,
    currency: &'a str,
    method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    vpa: Option<&'a str>,
    status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_description: Option<&'a str>,
    created_at: DateTime<Utc>,
}

pub fn payment_event_data(payment: &Payment) -> serde_json::Value {
    json!({
        "payment": PaymentEventData {
            id: &payment.id,
            order_id: &payment.order_id,
            amount: payment.amount,
            currency: &payment.currency,
            method: payment.method,
            vpa: payment.vpa.as_deref(),
            status: payment.status,
            error_code: payment.error_code.as_deref(),
            error_description: payment.error_description.as_deref(),
            created_at: payment.created_at,
        }
    })
}

#[derive(Debug, Serialize)]
struct RefundEventData<'a> {
    id: &'a str,
    payment_id: &'a str,
    amount: i64,
    reason: Option<&'a str>,
    status: RefundStatus,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

pub fn refund_event_data(refund: &Refund) -> serde_json::Value {
    json!({
        "refund": RefundEventData {
            id: &refund.id,
            payment_id: &refund.payment_id,
            amount: refund.amount,
            reason: refund.reason.as_deref(),
            status: refund.status,
            created_at: refund.created_at,
            processed_at: refund.processed_at,
        }
    })
}

pub fn test_event_data() -> serde_json::Value {
    json!({ "message": "This is a test webhook" })
}
