use crate::queue::jobs::{self, JobPayload};
use crate::queue::redis_queue::JobQueue;
use crate::repo::payments_repo::PaymentsRepo;
use crate::repo::refunds_repo::RefundsRepo;
use crate::repo::webhook_logs_repo::WebhookLogsRepo;
use anyhow::Result;
use chrono::{Duration, Utc};

const SWEEP_INTERVAL_SECS: u64 = 30;
const GRACE_SECS: i64 = 60;
const BATCH_SIZE: i64 = 100;

/// Reconciliation loop: rows that should have a job but lost it (enqueue
/// failed after insert, process crashed mid-flight) are re-enqueued. Safe to
/// repeat because terminal writes are status-guarded and webhook delivery is
/// at-least-once.
#[derive(Clone)]
pub struct Sweeper {
    pub payments_repo: PaymentsRepo,
    pub refunds_repo: RefundsRepo,
    pub webhook_logs_repo: WebhookLogsRepo,
    pub queue: JobQueue,
}

impl Sweeper {
    pub async fn run(self) {
        tracing::info!("reconciliation sweeper started");
        loop {
            if let Err(err) = self.tick().await {
                tracing::error!("sweeper error: {:#}", err);
            }
            tokio::time::sleep(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS)).await;
        }
    }

    async fn tick(&self) -> Result<()> {
        let cutoff = Utc::now() - Duration::seconds(GRACE_SECS);

        for payment_id in self.payments_repo.stuck_pending(cutoff, BATCH_SIZE).await? {
            tracing::warn!("re-enqueueing stuck pending payment {}", payment_id);
            self.queue
                .enqueue(jobs::PAYMENT_QUEUE, JobPayload::ProcessPayment { payment_id }, 0)
                .await?;
        }

        for refund_id in self.refunds_repo.stuck_pending(cutoff, BATCH_SIZE).await? {
            tracing::warn!("re-enqueueing stuck pending refund {}", refund_id);
            self.queue
                .enqueue(jobs::REFUND_QUEUE, JobPayload::ProcessRefund { refund_id }, 0)
                .await?;
        }

        for log in self.webhook_logs_repo.overdue_pending(cutoff, BATCH_SIZE).await? {
            tracing::warn!("re-enqueueing overdue webhook log {}", log.id);
            self.queue
                .enqueue(
                    jobs::WEBHOOK_QUEUE,
                    JobPayload::DeliverWebhook {
                        log_id: Some(log.id),
                        merchant_id: log.merchant_id,
                        event: log.event.clone(),
                        data: log.payload.clone(),
                    },
                    0,
                )
                .await?;
        }

        Ok(())
    }
}
