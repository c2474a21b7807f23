use paygate::acquirer::simulated::SimulatedAcquirer;
use paygate::config::AppConfig;
use paygate::queue::redis_queue::JobQueue;
use paygate::repo::merchants_repo::MerchantsRepo;
use paygate::repo::payments_repo::PaymentsRepo;
use paygate::repo::refunds_repo::RefundsRepo;
use paygate::repo::webhook_logs_repo::WebhookLogsRepo;
use paygate::worker::payment_worker::PaymentWorker;
use paygate::worker::refund_worker::RefundWorker;
use paygate::worker::sweeper::Sweeper;
use paygate::worker::webhook_worker::WebhookWorker;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    let queue = JobQueue::new(&cfg.redis_url)?;
    let merchants_repo = MerchantsRepo { pool: pool.clone() };
    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let refunds_repo = RefundsRepo { pool: pool.clone() };
    let webhook_logs_repo = WebhookLogsRepo { pool: pool.clone() };

    let payment_worker = PaymentWorker {
        payments_repo: payments_repo.clone(),
        merchants_repo: merchants_repo.clone(),
        queue: queue.clone(),
        acquirer: Arc::new(SimulatedAcquirer::from_config(&cfg)),
    };
    tokio::spawn(payment_worker.run());

    let refund_worker = RefundWorker {
        refunds_repo: refunds_repo.clone(),
        payments_repo: payments_repo.clone(),
        merchants_repo: merchants_repo.clone(),
        queue: queue.clone(),
        fixed_delay_ms: if cfg.test_mode {
            Some(cfg.test_processing_delay_ms.unwrap_or(0))
        } else {
            None
        },
    };
    tokio::spawn(refund_worker.run());

    let webhook_worker = WebhookWorker {
        webhook_logs_repo: webhook_logs_repo.clone(),
        merchants_repo,
        queue: queue.clone(),
        client: reqwest::Client::new(),
        test_intervals: cfg.webhook_retry_intervals_test,
    };
    tokio::spawn(webhook_worker.run());

    let sweeper = Sweeper {
        payments_repo,
        refunds_repo,
        webhook_logs_repo,
        queue,
    };
    sweeper.run().await;

    Ok(())
}
