use axum::routing::{get, post, put};
use axum::Router;
use paygate::config::AppConfig;
use paygate::queue::redis_queue::JobQueue;
use paygate::repo::idempotency_repo::IdempotencyRepo;
use paygate::repo::merchants_repo::MerchantsRepo;
use paygate::repo::orders_repo::OrdersRepo;
use paygate::repo::payments_repo::PaymentsRepo;
use paygate::repo::refunds_repo::RefundsRepo;
use paygate::repo::webhook_logs_repo::WebhookLogsRepo;
use paygate::service::payment_service::PaymentService;
use paygate::AppState;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
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

    sqlx::migrate!("./migrations").run(&pool).await?;

    let queue = JobQueue::new(&cfg.redis_url)?;
    let merchants_repo = MerchantsRepo { pool: pool.clone() };
    let orders_repo = OrdersRepo { pool: pool.clone() };
    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let refunds_repo = RefundsRepo { pool: pool.clone() };
    let webhook_logs_repo = WebhookLogsRepo { pool: pool.clone() };
    let idempotency_repo = IdempotencyRepo { pool: pool.clone() };

    let payment_service = PaymentService {
        pool: pool.clone(),
        payments_repo: payments_repo.clone(),
        refunds_repo: refunds_repo.clone(),
        idempotency_repo,
        queue: queue.clone(),
    };

    let state = AppState {
        payment_service,
        merchants_repo,
        orders_repo,
        payments_repo,
        refunds_repo,
        webhook_logs_repo,
        queue,
    };

    let protected = Router::new()
        .route(
            "/api/v1/orders",
            post(paygate::http::handlers::orders::create_order)
                .get(paygate::http::handlers::orders::list_orders),
        )
        .route(
            "/api/v1/orders/:order_id",
            get(paygate::http::handlers::orders::get_order),
        )
        .route(
            "/api/v1/payments",
            post(paygate::http::handlers::payments::create_payment)
                .get(paygate::http::handlers::payments::list_payments),
        )
        .route(
            "/api/v1/payments/:payment_id",
            get(paygate::http::handlers::payments::get_payment),
        )
        .route(
            "/api/v1/payments/:payment_id/capture",
            post(paygate::http::handlers::payments::capture_payment),
        )
        .route(
            "/api/v1/payments/:payment_id/refunds",
            post(paygate::http::handlers::refunds::create_refund),
        )
        .route(
            "/api/v1/refunds",
            get(paygate::http::handlers::refunds::list_refunds),
        )
        .route(
            "/api/v1/refunds/:refund_id",
            get(paygate::http::handlers::refunds::get_refund),
        )
        .route(
            "/api/v1/webhooks",
            get(paygate::http::handlers::webhooks::list_webhooks),
        )
        .route(
            "/api/v1/webhooks/:log_id/retry",
            post(paygate::http::handlers::webhooks::retry_webhook),
        )
        .route(
            "/api/v1/merchants/profile",
            get(paygate::http::handlers::merchants::get_profile),
        )
        .route(
            "/api/v1/merchants/webhook",
            put(paygate::http::handlers::merchants::update_webhook),
        )
        .route(
            "/api/v1/merchants/webhook/regenerate-secret",
            post(paygate::http::handlers::merchants::regenerate_webhook_secret),
        )
        .route(
            "/api/v1/merchants/webhook/test",
            post(paygate::http::handlers::merchants::send_test_webhook),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            paygate::http::auth::require_merchant,
        ));

    let app = Router::new()
        .route("/health", get(paygate::http::handlers::ops::health))
        .route(
            "/api/v1/test/jobs/status",
            get(paygate::http::handlers::ops::jobs_status),
        )
        .merge(protected)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
