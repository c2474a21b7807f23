use crate::domain::order::Order;
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrdersRepo {
    pub pool: PgPool,
}

impl OrdersRepo {
    pub async fn insert(&self, order: &Order) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, merchant_id, amount, currency, receipt, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&order.id)
        .bind(order.merchant_id)
        .bind(order.amount)
        .bind(&order.currency)
        .bind(&order.receipt)
        .bind(&order.status)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, id: &str, merchant_id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query(
            "SELECT id, merchant_id, amount, currency, receipt, status, created_at FROM orders WHERE id = $1 AND merchant_id = $2",
        )
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_order(&r)))
    }

    /// Read-locks the order for the duration of the payment-creation
    /// transaction.
    pub async fn get_for_share_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: &str,
        merchant_id: Uuid,
    ) -> Result<Option<Order>> {
        let row = sqlx::query(
            "SELECT id, merchant_id, amount, currency, receipt, status, created_at FROM orders WHERE id = $1 AND merchant_id = $2 FOR SHARE",
        )
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(row.map(|r| map_order(&r)))
    }

    pub async fn list(&self, merchant_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT id, merchant_id, amount, currency, receipt, status, created_at FROM orders WHERE merchant_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(merchant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_order).collect())
    }

    pub async fn count(&self, merchant_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT count(*) AS total FROM orders WHERE merchant_id = $1")
            .bind(merchant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("total"))
    }
}

fn map_order(r: &PgRow) -> Order {
    Order {
        id: r.get("id"),
        merchant_id: r.get("merchant_id"),
        amount: r.get("amount"),
        currency: r.get("currency"),
        receipt: r.get("receipt"),
        status: r.get("status"),
        created_at: r.get("created_at"),
    }
}
