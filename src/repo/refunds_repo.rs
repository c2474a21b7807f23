use crate::domain::refund::{Refund, RefundStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

const COLUMNS: &str = "id, payment_id, merchant_id, amount, reason, status, created_at, processed_at";

#[derive(Clone)]
pub struct RefundsRepo {
    pub pool: PgPool,
}

impl RefundsRepo {
    pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, refund: &Refund) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO refunds (id, payment_id, merchant_id, amount, reason, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&refund.id)
        .bind(&refund.payment_id)
        .bind(refund.merchant_id)
        .bind(refund.amount)
        .bind(&refund.reason)
        .bind(refund.status.as_str())
        .bind(refund.created_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    /// Sum of all refunds recorded against the payment, read inside the same
    /// transaction that holds the payment row lock.
    pub async fn total_for_payment_tx(
        tx: &mut Transaction<'_, Postgres>,
        payment_id: &str,
    ) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT AS total FROM refunds WHERE payment_id = $1",
        )
        .bind(payment_id)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(row.get("total"))
    }

    pub async fn get(&self, id: &str, merchant_id: Uuid) -> Result<Option<Refund>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM refunds WHERE id = $1 AND merchant_id = $2"
        ))
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_refund(&r)))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Refund>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM refunds WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| map_refund(&r)))
    }

    pub async fn list(&self, merchant_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Refund>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM refunds WHERE merchant_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(merchant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_refund).collect())
    }

    pub async fn count(&self, merchant_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT count(*) AS total FROM refunds WHERE merchant_id = $1")
            .bind(merchant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("total"))
    }

    /// Marks the refund processed exactly once, inside the caller's
    /// transaction so the webhook log row commits with it; None when already
    /// processed.
    pub async fn mark_processed_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: &str,
    ) -> Result<Option<Refund>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE refunds
            SET status = 'processed', processed_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(row.map(|r| map_refund(&r)))
    }

    pub async fn stuck_pending(&self, cutoff: DateTime<Utc>, limit: i64) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT id FROM refunds WHERE status = 'pending' AND created_at < $1 ORDER BY created_at ASC LIMIT $2",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|r| r.get("id")).collect())
    }
}

fn map_refund(r: &PgRow) -> Refund {
    Refund {
        id: r.get("id"),
        payment_id: r.get("payment_id"),
        merchant_id: r.get("merchant_id"),
        amount: r.get("amount"),
        reason: r.get("reason"),
        status: RefundStatus::from_db(r.get::<String, _>("status").as_str()),
        created_at: r.get("created_at"),
        processed_at: r.get("processed_at"),
    }
}
