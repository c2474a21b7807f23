use crate::domain::payment::{CardNetwork, Payment, PaymentMethod, PaymentStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

const COLUMNS: &str = "id, merchant_id, order_id, amount, currency, method, vpa, card_last4, card_network, status, captured, error_code, error_description, created_at";

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

impl PaymentsRepo {
    pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, merchant_id, order_id, amount, currency, method,
                vpa, card_last4, card_network, status, captured, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&payment.id)
        .bind(payment.merchant_id)
        .bind(&payment.order_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(payment.method.as_str())
        .bind(&payment.vpa)
        .bind(&payment.card_last4)
        .bind(payment.card_network.map(|n| n.as_str()))
        .bind(payment.status.as_str())
        .bind(payment.captured)
        .bind(payment.created_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn get(&self, id: &str, merchant_id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM payments WHERE id = $1 AND merchant_id = $2"
        ))
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_payment(&r)))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM payments WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| map_payment(&r)))
    }

    /// Row-locks the payment so concurrent refund requests serialize on it.
    pub async fn get_for_update_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: &str,
        merchant_id: Uuid,
    ) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM payments WHERE id = $1 AND merchant_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(row.map(|r| map_payment(&r)))
    }

    pub async fn list(&self, merchant_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Payment>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM payments WHERE merchant_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(merchant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_payment).collect())
    }

    pub async fn count(&self, merchant_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT count(*) AS total FROM payments WHERE merchant_id = $1")
            .bind(merchant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("total"))
    }

    /// Writes a terminal status inside the caller's transaction, so the
    /// webhook log row commits with it. Guarded so a terminal state is never
    /// overwritten; returns None when the payment was already terminal.
    pub async fn mark_terminal_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: &str,
        status: PaymentStatus,
        error_code: Option<&str>,
        error_description: Option<&str>,
    ) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE payments
            SET status = $2, error_code = $3, error_description = $4, updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(error_code)
        .bind(error_description)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(row.map(|r| map_payment(&r)))
    }

    /// Flips `captured` exactly once; returns None if the payment is not an
    /// uncaptured success.
    pub async fn capture(&self, id: &str, merchant_id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE payments
            SET captured = true, updated_at = now()
            WHERE id = $1 AND merchant_id = $2 AND status = 'success' AND captured = false
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_payment(&r)))
    }

    /// Pending payments older than the cutoff, for the reconciliation sweeper.
    pub async fn stuck_pending(&self, cutoff: DateTime<Utc>, limit: i64) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT id FROM payments WHERE status = 'pending' AND created_at < $1 ORDER BY created_at ASC LIMIT $2",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| r.get("id")).collect())
    }
}

fn map_payment(r: &PgRow) -> Payment {
    Payment {
        id: r.get("id"),
        merchant_id: r.get("merchant_id"),
        order_id: r.get("order_id"),
        amount: r.get("amount"),
        currency: r.get("currency"),
        method: PaymentMethod::from_db(r.get::<String, _>("method").as_str()),
        vpa: r.get("vpa"),
        card_last4: r.get("card_last4"),
        card_network: r
            .get::<Option<String>, _>("card_network")
            .map(|n| CardNetwork::from_db(&n)),
        status: PaymentStatus::from_db(r.get::<String, _>("status").as_str()),
        captured: r.get("captured"),
        error_code: r.get("error_code"),
        error_description: r.get("error_description"),
        created_at: r.get("created_at"),
    }
}
