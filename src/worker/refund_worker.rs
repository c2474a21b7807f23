use crate::domain::payment::PaymentStatus;
use crate::domain::refund::RefundStatus;
use crate::domain::webhook::{self, EVENT_REFUND_PROCESSED};
use crate::queue::jobs::{self, JobPayload};
use crate::queue::redis_queue::JobQueue;
use crate::repo::merchants_repo::MerchantsRepo;
use crate::repo::payments_repo::PaymentsRepo;
use crate::repo::refunds_repo::RefundsRepo;
use crate::repo::webhook_logs_repo::WebhookLogsRepo;
use anyhow::Result;
use rand::Rng;

const POLL_INTERVAL_MS: u64 = 200;

#[derive(Clone)]
pub struct RefundWorker {
    pub refunds_repo: RefundsRepo,
    pub payments_repo: PaymentsRepo,
    pub merchants_repo: MerchantsRepo,
    pub queue: JobQueue,
    pub fixed_delay_ms: Option<u64>,
}

impl RefundWorker {
    pub async fn run(self) {
        tracing::info!("refund worker started");
        loop {
            match self.tick().await {
                Ok(true) => {}
                Ok(false) => {
                    tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
                Err(err) => {
                    tracing::error!("refund worker error: {:#}", err);
                    tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
            }
        }
    }

    async fn tick(&self) -> Result<bool> {
        let Some(lease) = self.queue.pull(jobs::REFUND_QUEUE).await? else {
            return Ok(false);
        };

        let JobPayload::ProcessRefund { refund_id } = lease.job.payload.clone() else {
            tracing::warn!("unexpected job kind on {}", jobs::REFUND_QUEUE);
            self.queue.complete(lease).await?;
            return Ok(true);
        };

        match self.process(&refund_id).await {
            Ok(()) => self.queue.complete(lease).await?,
            Err(err) => {
                tracing::error!("processing refund {} failed: {:#}", refund_id, err);
                self.queue.fail(lease).await?;
            }
        }

        Ok(true)
    }

    async fn process(&self, refund_id: &str) -> Result<()> {
        let Some(refund) = self.refunds_repo.get_by_id(refund_id).await? else {
            tracing::warn!("refund {} not found, dropping job", refund_id);
            return Ok(());
        };
        if refund.status == RefundStatus::Processed {
            return Ok(());
        }

        let Some(payment) = self.payments_repo.get_by_id(&refund.payment_id).await? else {
            tracing::warn!("payment {} for refund {} not found", refund.payment_id, refund_id);
            return Ok(());
        };
        if payment.status != PaymentStatus::Success {
            tracing::warn!(
                "skipping refund {} on non-success payment {}",
                refund_id,
                payment.id
            );
            return Ok(());
        }

        let merchant = self.merchants_repo.get(refund.merchant_id).await?;
        let wants_webhook = merchant.as_ref().is_some_and(|m| m.webhook_url.is_some());

        let delay_ms = match self.fixed_delay_ms {
            Some(ms) => ms,
            None => rand::thread_rng().gen_range(3_000..=5_000),
        };
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;

        // As with payments: the pending log row commits with the processed
        // write, so a lost enqueue stays recoverable from the store.
        let mut tx = self.refunds_repo.pool.begin().await?;
        let Some(processed) = RefundsRepo::mark_processed_tx(&mut tx, refund_id).await? else {
            // Another consumer already processed it.
            tx.rollback().await?;
            return Ok(());
        };

        let log = if wants_webhook {
            Some(
                WebhookLogsRepo::insert_tx(
                    &mut tx,
                    processed.merchant_id,
                    EVENT_REFUND_PROCESSED,
                    &webhook::refund_event_data(&processed),
                )
                .await?,
            )
        } else {
            None
        };
        tx.commit().await?;

        tracing::info!("refund {} processed", processed.id);

        if let Some(log) = log {
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
