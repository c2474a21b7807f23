use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct IdempotencyRepo {
    pub pool: PgPool,
}

impl IdempotencyRepo {
    /// Reads the cached response for the key inside the caller's transaction.
    /// Expired rows are deleted and reported as a miss.
    pub async fn fetch_tx(
        tx: &mut Transaction<'_, Postgres>,
        key: &str,
        merchant_id: Uuid,
    ) -> Result<Option<serde_json::Value>> {
        let row = sqlx::query(
            "SELECT response, expires_at FROM idempotency_records WHERE key = $1 AND merchant_id = $2",
        )
        .bind(key)
        .bind(merchant_id)
        .fetch_optional(tx.as_mut())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = row.get("expires_at");
        if expires_at <= Utc::now() {
            sqlx::query("DELETE FROM idempotency_records WHERE key = $1 AND merchant_id = $2")
                .bind(key)
                .bind(merchant_id)
                .execute(tx.as_mut())
                .await?;
            return Ok(None);
        }

        Ok(Some(row.get("response")))
    }

    /// Stores the response under the key. On a conflicting concurrent insert
    /// the other party won: their stored response is returned instead.
    pub async fn put(
        &self,
        key: &str,
        merchant_id: Uuid,
        response: &serde_json::Value,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<serde_json::Value>> {
        let result = sqlx::query(
            r#"
            INSERT INTO idempotency_records (key, merchant_id, response, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key, merchant_id) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(merchant_id)
        .bind(response)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(None);
        }

        let row = sqlx::query(
            "SELECT response FROM idempotency_records WHERE key = $1 AND merchant_id = $2",
        )
        .bind(key)
        .bind(merchant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get("response")))
    }
}
