pub mod acquirer;
pub mod config;
pub mod domain {
    pub mod ids;
    pub mod merchant;
    pub mod order;
    pub mod payment;
    pub mod refund;
    pub mod webhook;
}
pub mod http {
    pub mod auth;
    pub mod error;
    pub mod handlers {
        pub mod merchants;
        pub mod ops;
        pub mod orders;
        pub mod payments;
        pub mod refunds;
        pub mod webhooks;
    }
    pub mod pagination;
}
pub mod queue {
    pub mod jobs;
    pub mod redis_queue;
}
pub mod repo {
    pub mod idempotency_repo;
    pub mod merchants_repo;
    pub mod orders_repo;
    pub mod payments_repo;
    pub mod refunds_repo;
    pub mod webhook_logs_repo;
}
pub mod service {
    pub mod payment_service;
}
pub mod signing;
pub mod worker {
    pub mod payment_worker;
    pub mod refund_worker;
    pub mod sweeper;
    pub mod webhook_worker;
}

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub merchants_repo: repo::merchants_repo::MerchantsRepo,
    pub orders_repo: repo::orders_repo::OrdersRepo,
    pub payments_repo: repo::payments_repo::PaymentsRepo,
    pub refunds_repo: repo::refunds_repo::RefundsRepo,
    pub webhook_logs_repo: repo::webhook_logs_repo::WebhookLogsRepo,
    pub queue: queue::redis_queue::JobQueue,
}
