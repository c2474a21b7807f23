use crate::domain::webhook::{WebhookLog, WebhookStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

const COLUMNS: &str = "id, merchant_id, event, payload, status, attempts, last_attempt_at, next_retry_at, response_code, response_body, created_at";

#[derive(Clone)]
pub struct WebhookLogsRepo {
    pub pool: PgPool,
}

impl WebhookLogsRepo {
    pub async fn insert(
        &self,
        merchant_id: Uuid,
        event: &str,
        payload: &serde_json::Value,
    ) -> Result<WebhookLog> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO webhook_logs (id, merchant_id, event, payload, status, attempts)
            VALUES ($1, $2, $3, $4, 'pending', 0)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(merchant_id)
        .bind(event)
        .bind(payload)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_log(&row))
    }

    /// Inserts a pending log inside the caller's transaction, so the fan-out
    /// record commits with the terminal state that triggered it.
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        merchant_id: Uuid,
        event: &str,
        payload: &serde_json::Value,
    ) -> Result<WebhookLog> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO webhook_logs (id, merchant_id, event, payload, status, attempts)
            VALUES ($1, $2, $3, $4, 'pending', 0)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(merchant_id)
        .bind(event)
        .bind(payload)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(map_log(&row))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<WebhookLog>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM webhook_logs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| map_log(&r)))
    }

    pub async fn list(&self, merchant_id: Uuid, limit: i64, offset: i64) -> Result<Vec<WebhookLog>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM webhook_logs WHERE merchant_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(merchant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_log).collect())
    }

    pub async fn count(&self, merchant_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT count(*) AS total FROM webhook_logs WHERE merchant_id = $1")
            .bind(merchant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("total"))
    }

    pub async fn mark_delivered(
        &self,
        id: Uuid,
        attempts: i32,
        response_code: i32,
        response_body: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE webhook_logs
            SET status = 'success', attempts = $2, last_attempt_at = now(), next_retry_at = NULL,
                response_code = $3, response_body = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(attempts)
        .bind(response_code)
        .bind(response_body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_retrying(
        &self,
        id: Uuid,
        attempts: i32,
        response_code: i32,
        response_body: &str,
        next_retry_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE webhook_logs
            SET status = 'pending', attempts = $2, last_attempt_at = now(), next_retry_at = $3,
                response_code = $4, response_body = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(attempts)
        .bind(next_retry_at)
        .bind(response_code)
        .bind(response_body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_exhausted(
        &self,
        id: Uuid,
        attempts: i32,
        response_code: i32,
        response_body: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE webhook_logs
            SET status = 'failed', attempts = $2, last_attempt_at = now(), next_retry_at = NULL,
                response_code = $3, response_body = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(attempts)
        .bind(response_code)
        .bind(response_body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Manual retry: fresh schedule, not a continuation.
    pub async fn reset_for_retry(&self, id: Uuid, merchant_id: Uuid) -> Result<Option<WebhookLog>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE webhook_logs
            SET status = 'pending', attempts = 0, next_retry_at = NULL
            WHERE id = $1 AND merchant_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_log(&r)))
    }

    /// Pending logs whose scheduled delivery is overdue, for the sweeper.
    pub async fn overdue_pending(&self, cutoff: DateTime<Utc>, limit: i64) -> Result<Vec<WebhookLog>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COLUMNS} FROM webhook_logs
            WHERE status = 'pending' AND COALESCE(next_retry_at, created_at) < $1
            ORDER BY next_retry_at ASC NULLS FIRST
            LIMIT $2
            "#
        ))
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_log).collect())
    }
}

fn map_log(r: &PgRow) -> WebhookLog {
    WebhookLog {
        id: r.get("id"),
        merchant_id: r.get("merchant_id"),
        event: r.get("event"),
        payload: r.get("payload"),
        status: WebhookStatus::from_db(r.get::<String, _>("status").as_str()),
        attempts: r.get("attempts"),
        last_attempt_at: r.get("last_attempt_at"),
        next_retry_at: r.get("next_retry_at"),
        response_code: r.get("response_code"),
        response_body: r.get("response_body"),
        created_at: r.get("created_at"),
    }
}
