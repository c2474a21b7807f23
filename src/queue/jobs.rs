use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PAYMENT_QUEUE: &str = "payment-processing";
pub const REFUND_QUEUE: &str = "refund-processing";
pub const WEBHOOK_QUEUE: &str = "webhook-delivery";

pub const QUEUES: [&str; 3] = [PAYMENT_QUEUE, REFUND_QUEUE, WEBHOOK_QUEUE];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobPayload {
    ProcessPayment {
        payment_id: String,
    },
    ProcessRefund {
        refund_id: String,
    },
    DeliverWebhook {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        log_id: Option<Uuid>,
        merchant_id: Uuid,
        event: String,
        data: serde_json::Value,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub attempts: i32,
    pub payload: JobPayload,
}

/// Queue-level retries on worker error. The webhook deliverer owns its own
/// schedule, so its queue never retries.
pub fn max_worker_retries(queue: &str) -> i32 {
    match queue {
        WEBHOOK_QUEUE => 0,
        _ => 3,
    }
}

/// Exponential backoff for queue-level retries: 1 s, 2 s, 4 s.
pub fn worker_retry_delay_ms(retry: i32) -> u64 {
    1_000u64 << (retry.clamp(1, 16) - 1) as u32
}
