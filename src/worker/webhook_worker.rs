use crate::domain::webhook::{
    self, DeliveryDisposition, WebhookEnvelope, WebhookStatus, DELIVERY_TIMEOUT_SECS,
    RESPONSE_BODY_LIMIT,
};
use crate::queue::jobs::{self, JobPayload};
use crate::queue::redis_queue::JobQueue;
use crate::repo::merchants_repo::MerchantsRepo;
use crate::repo::webhook_logs_repo::WebhookLogsRepo;
use crate::signing;
use anyhow::Result;
use chrono::{Duration, Utc};
use uuid::Uuid;

const POLL_INTERVAL_MS: u64 = 200;

#[derive(Clone)]
pub struct WebhookWorker {
    pub webhook_logs_repo: WebhookLogsRepo,
    pub merchants_repo: MerchantsRepo,
    pub queue: JobQueue,
    pub client: reqwest::Client,
    pub test_intervals: bool,
}

impl WebhookWorker {
    pub async fn run(self) {
        tracing::info!("webhook deliverer started");
        loop {
            match self.tick().await {
                Ok(true) => {}
                Ok(false) => {
                    tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
                Err(err) => {
                    tracing::error!("webhook deliverer error: {:#}", err);
                    tokio::time::sleep(std::time::Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
            }
        }
    }

    async fn tick(&self) -> Result<bool> {
        let Some(lease) = self.queue.pull(jobs::WEBHOOK_QUEUE).await? else {
            return Ok(false);
        };

        let JobPayload::DeliverWebhook {
            log_id,
            merchant_id,
            event,
            data,
        } = lease.job.payload.clone()
        else {
            tracing::warn!("unexpected job kind on {}", jobs::WEBHOOK_QUEUE);
            self.queue.complete(lease).await?;
            return Ok(true);
        };

        // Delivery failures are recorded on the log, never signalled by
        // erroring; an Err here means the store or queue misbehaved.
        match self.process(log_id, merchant_id, &event, &data).await {
            Ok(()) => self.queue.complete(lease).await?,
            Err(err) => {
                tracing::error!("webhook delivery job {} failed: {:#}", lease.job.id, err);
                self.queue.fail(lease).await?;
            }
        }

        Ok(true)
    }

    async fn process(
        &self,
        log_id: Option<Uuid>,
        merchant_id: Uuid,
        event: &str,
        data: &serde_json::Value,
    ) -> Result<()> {
        let log = match log_id {
            Some(id) => match self.webhook_logs_repo.get(id).await? {
                Some(log) => log,
                None => {
                    tracing::warn!("webhook log {} not found, dropping delivery", id);
                    return Ok(());
                }
            },
            None => self.webhook_logs_repo.insert(merchant_id, event, data).await?,
        };

        if log.status != WebhookStatus::Pending {
            return Ok(());
        }

        let Some(merchant) = self.merchants_repo.get(log.merchant_id).await? else {
            return Ok(());
        };
        let Some(url) = merchant.webhook_url.as_deref() else {
            // Endpoint was removed after fan-out; leave the log untouched.
            return Ok(());
        };
        let secret = merchant.webhook_secret.as_deref().unwrap_or("");

        // Serialized exactly once; the signature covers these exact bytes.
        let envelope = WebhookEnvelope {
            event,
            timestamp: Utc::now().timestamp(),
            data,
        };
        let body = serde_json::to_vec(&envelope)?;
        let signature = signing::sign(secret, &body);

        let result = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Webhook-Signature", signature)
            .body(body)
            .timeout(std::time::Duration::from_secs(DELIVERY_TIMEOUT_SECS))
            .send()
            .await;

        let (delivered, response_code, response_body) = match result {
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                (
                    status.is_success(),
                    status.as_u16() as i32,
                    truncate(&text),
                )
            }
            // Timeouts and connection errors carry response code 0.
            Err(err) => (false, 0, truncate(&err.to_string())),
        };

        let attempts_done = log.attempts + 1;
        match webhook::after_attempt(attempts_done, delivered, self.test_intervals) {
            DeliveryDisposition::Delivered => {
                self.webhook_logs_repo
                    .mark_delivered(log.id, attempts_done, response_code, &response_body)
                    .await?;
            }
            DeliveryDisposition::Exhausted => {
                tracing::warn!(
                    "webhook log {} exhausted after {} attempts",
                    log.id,
                    attempts_done
                );
                self.webhook_logs_repo
                    .mark_exhausted(log.id, attempts_done, response_code, &response_body)
                    .await?;
            }
            DeliveryDisposition::RetryScheduled { delay_ms, .. } => {
                let next_retry_at = Utc::now() + Duration::milliseconds(delay_ms as i64);
                self.webhook_logs_repo
                    .mark_retrying(
                        log.id,
                        attempts_done,
                        response_code,
                        &response_body,
                        next_retry_at,
                    )
                    .await?;
                // The next delivery is only enqueued after the log update
                // commits, so attempts stay serial and monotonic. The job's
                // payload is carried forward; it wins over the stored log if
                // they ever diverge.
                self.queue
                    .enqueue(
                        jobs::WEBHOOK_QUEUE,
                        JobPayload::DeliverWebhook {
                            log_id: Some(log.id),
                            merchant_id: log.merchant_id,
                            event: event.to_string(),
                            data: data.clone(),
                        },
                        delay_ms,
                    )
                    .await?;
            }
        }

        Ok(())
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(RESPONSE_BODY_LIMIT).collect()
}
