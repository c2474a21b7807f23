use crate::domain::ids;
use crate::domain::merchant::Merchant;
use crate::domain::payment::{
    CreatePaymentRequest, Instrument, Payment, PaymentStatus,
};
use crate::domain::refund::{CreateRefundRequest, Refund, RefundStatus};
use crate::http::error::ApiError;
use crate::queue::jobs::{self, JobPayload};
use crate::queue::redis_queue::JobQueue;
use crate::repo::idempotency_repo::IdempotencyRepo;
use crate::repo::orders_repo::OrdersRepo;
use crate::repo::payments_repo::PaymentsRepo;
use crate::repo::refunds_repo::RefundsRepo;
use chrono::{Duration, Utc};
use sqlx::PgPool;

pub const IDEMPOTENCY_TTL_HOURS: i64 = 24;

#[derive(Clone)]
pub struct PaymentService {
    pub pool: PgPool,
    pub payments_repo: PaymentsRepo,
    pub refunds_repo: RefundsRepo,
    pub idempotency_repo: IdempotencyRepo,
    pub queue: JobQueue,
}

impl PaymentService {
    /// Creates a pending payment under a single transaction: idempotency
    /// lookup, read-lock on the parent order, insert. The processing job is
    /// enqueued after commit; the idempotency record is written last, with
    /// the serialized response.
    pub async fn create_payment(
        &self,
        merchant: &Merchant,
        req: CreatePaymentRequest,
        idempotency_key: Option<String>,
    ) -> Result<serde_json::Value, ApiError> {
        let key = idempotency_key.filter(|k| !k.is_empty());

        let mut tx = self.pool.begin().await?;

        // The cached response wins before any validation: a replayed key
        // returns the original 201 even if the retried body differs.
        if let Some(key) = key.as_deref() {
            if let Some(cached) = IdempotencyRepo::fetch_tx(&mut tx, key, merchant.id).await? {
                tx.commit().await?;
                return Ok(cached);
            }
        }

        let instrument =
            Instrument::from_request(&req).map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

        let order = OrdersRepo::get_for_share_tx(&mut tx, &req.order_id, merchant.id)
            .await?
            .ok_or(ApiError::NotFound("order"))?;

        let (vpa, card_last4, card_network) = match instrument {
            Instrument::Upi { vpa } => (Some(vpa), None, None),
            Instrument::Card { last4, network } => (None, Some(last4), Some(network)),
        };

        let payment = Payment {
            id: ids::payment_id(),
            merchant_id: merchant.id,
            order_id: order.id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            method: req.method,
            vpa,
            card_last4,
            card_network,
            status: PaymentStatus::Pending,
            captured: false,
            error_code: None,
            error_description: None,
            created_at: Utc::now(),
        };

        PaymentsRepo::insert_tx(&mut tx, &payment).await?;
        tx.commit().await?;

        // An enqueue failure here surfaces as a 500 and leaves the payment
        // pending; the sweeper picks it up.
        self.queue
            .enqueue(
                jobs::PAYMENT_QUEUE,
                JobPayload::ProcessPayment {
                    payment_id: payment.id.clone(),
                },
                0,
            )
            .await?;

        let response = serde_json::to_value(&payment)?;

        if let Some(key) = key.as_deref() {
            let expires_at = Utc::now() + Duration::hours(IDEMPOTENCY_TTL_HOURS);
            if let Some(winner) = self
                .idempotency_repo
                .put(key, merchant.id, &response, expires_at)
                .await?
            {
                return Ok(winner);
            }
        }

        Ok(response)
    }

    /// Full-amount capture; the request-body amount is ignored.
    pub async fn capture_payment(
        &self,
        merchant: &Merchant,
        payment_id: &str,
    ) -> Result<Payment, ApiError> {
        let payment = self
            .payments_repo
            .get(payment_id, merchant.id)
            .await?
            .ok_or(ApiError::NotFound("payment"))?;

        if payment.status != PaymentStatus::Success {
            return Err(ApiError::BadRequest(
                "only successful payments can be captured".to_string(),
            ));
        }
        if payment.captured {
            return Err(ApiError::BadRequest("payment is already captured".to_string()));
        }

        match self.payments_repo.capture(payment_id, merchant.id).await? {
            Some(updated) => Ok(updated),
            // A concurrent capture won between the read and the guarded write.
            None => Err(ApiError::BadRequest("payment is already captured".to_string())),
        }
    }

    /// Inserts a pending refund with the available-amount check executed under
    /// a row lock on the parent payment.
    pub async fn create_refund(
        &self,
        merchant: &Merchant,
        payment_id: &str,
        req: CreateRefundRequest,
    ) -> Result<Refund, ApiError> {
        if req.amount < 1 {
            return Err(ApiError::BadRequest("amount must be at least 1".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let payment = PaymentsRepo::get_for_update_tx(&mut tx, payment_id, merchant.id)
            .await?
            .ok_or(ApiError::NotFound("payment"))?;

        if payment.status != PaymentStatus::Success {
            return Err(ApiError::BadRequest(
                "only successful payments can be refunded".to_string(),
            ));
        }

        let refunded = RefundsRepo::total_for_payment_tx(&mut tx, payment_id).await?;
        let available = payment.amount - refunded;
        if req.amount > available {
            return Err(ApiError::BadRequest(format!(
                "refund amount exceeds available amount of {}",
                available
            )));
        }

        let refund = Refund {
            id: ids::refund_id(),
            payment_id: payment.id.clone(),
            merchant_id: merchant.id,
            amount: req.amount,
            reason: req.reason,
            status: RefundStatus::Pending,
            created_at: Utc::now(),
            processed_at: None,
        };

        RefundsRepo::insert_tx(&mut tx, &refund).await?;
        tx.commit().await?;

        self.queue
            .enqueue(
                jobs::REFUND_QUEUE,
                JobPayload::ProcessRefund {
                    refund_id: refund.id.clone(),
                },
                0,
            )
            .await?;

        Ok(refund)
    }
}
