use crate::acquirer::Acquirer;
use crate::domain::payment::PaymentStatus;
use crate::domain::webhook::{self, EVENT_PAYMENT_FAILED, EVENT_PAYMENT_SUCCESS};
use crate::queue::jobs::{self, JobPayload};
use crate::queue::redis_queue::JobQueue;
use crate::repo::merchants_repo::MerchantsRepo;
use crate::repo::payments_repo::PaymentsRepo;
use crate::repo::webhook_logs_repo::WebhookLogsRepo;
use anyhow::Result;
use std::sync::Arc;

const POLL_INTERVAL_MS: u64 = 200;

#[derive(Clone)]
pub struct PaymentWorker {
    pub payments_repo: PaymentsRepo,
    pub merchants_repo: MerchantsRepo,
    pub queue: JobQueue,
    pub acquirer: Arc<dyn Acquirer>,
}

impl PaymentWorker {
    pub async fn run(self) {
        tracing::info!("payment worker started");
        loop {
            match self.tick().await {
                Ok(true) => {}
                Ok(false) => {
                    tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
                Err(err) => {
                    tracing::error!("payment worker error: {:#}", err);
                    tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
            }
        }
    }

    async fn tick(&self) -> Result<bool> {
        let Some(lease) = self.queue.pull(jobs::PAYMENT_QUEUE).await? else {
            return Ok(false);
        };

        let JobPayload::ProcessPayment { payment_id } = lease.job.payload.clone() else {
            tracing::warn!("unexpected job kind on {}", jobs::PAYMENT_QUEUE);
            self.queue.complete(lease).await?;
            return Ok(true);
        };

        match self.process(&payment_id).await {
            Ok(()) => self.queue.complete(lease).await?,
            Err(err) => {
                tracing::error!("processing payment {} failed: {:#}", payment_id, err);
                self.queue.fail(lease).await?;
            }
        }

        Ok(true)
    }

    async fn process(&self, payment_id: &str) -> Result<()> {
        let Some(payment) = self.payments_repo.get_by_id(payment_id).await? else {
            tracing::warn!("payment {} not found, dropping job", payment_id);
            return Ok(());
        };
        // Queue retries and sweeper re-runs land here; a terminal state wins.
        if payment.status != PaymentStatus::Pending {
            return Ok(());
        }

        let merchant = self.merchants_repo.get(payment.merchant_id).await?;
        let wants_webhook = merchant.as_ref().is_some_and(|m| m.webhook_url.is_some());

        let outcome = self.acquirer.process(&payment).await;
        let status = if outcome.approved {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failed
        };

        // The pending log row commits with the terminal write. A delivery job
        // lost to an enqueue failure is restored from that row by the
        // sweeper; retried payment jobs short-circuit on the terminal guard.
        let mut tx = self.payments_repo.pool.begin().await?;
        let Some(updated) = PaymentsRepo::mark_terminal_tx(
            &mut tx,
            payment_id,
            status,
            outcome.error_code.as_deref(),
            outcome.error_description.as_deref(),
        )
        .await?
        else {
            // Another consumer finished this payment first.
            tx.rollback().await?;
            return Ok(());
        };

        let log = if wants_webhook {
            let event = if updated.status == PaymentStatus::Success {
                EVENT_PAYMENT_SUCCESS
            } else {
                EVENT_PAYMENT_FAILED
            };
            Some(
                WebhookLogsRepo::insert_tx(
                    &mut tx,
                    updated.merchant_id,
                    event,
                    &webhook::payment_event_data(&updated),
                )
                .await?,
            )
        } else {
            None
        };
        tx.commit().await?;

        tracing::info!("payment {} settled as {}", updated.id, updated.status.as_str());

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
