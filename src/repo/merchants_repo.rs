use crate::domain::merchant::Merchant;
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct MerchantsRepo {
    pub pool: PgPool,
}

impl MerchantsRepo {
    pub async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Merchant>> {
        let row = sqlx::query(
            "SELECT id, name, email, api_key, api_secret, webhook_url, webhook_secret, created_at FROM merchants WHERE api_key = $1",
        )
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_merchant(&r)))
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Merchant>> {
        let row = sqlx::query(
            "SELECT id, name, email, api_key, api_secret, webhook_url, webhook_secret, created_at FROM merchants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| map_merchant(&r)))
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        api_key: &str,
        api_secret: &str,
    ) -> Result<Merchant> {
        let row = sqlx::query(
            r#"
            INSERT INTO merchants (id, name, email, api_key, api_secret)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, api_key, api_secret, webhook_url, webhook_secret, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(api_key)
        .bind(api_secret)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_merchant(&row))
    }

    pub async fn set_webhook_url(&self, id: Uuid, webhook_url: &str) -> Result<()> {
        sqlx::query("UPDATE merchants SET webhook_url = $2 WHERE id = $1")
            .bind(id)
            .bind(webhook_url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_webhook_secret(&self, id: Uuid, webhook_secret: &str) -> Result<()> {
        sqlx::query("UPDATE merchants SET webhook_secret = $2 WHERE id = $1")
            .bind(id)
            .bind(webhook_secret)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn map_merchant(r: &PgRow) -> Merchant {
    Merchant {
        id: r.get("id"),
        name: r.get("name"),
        email: r.get("email"),
        api_key: r.get("api_key"),
        api_secret: r.get("api_secret"),
        webhook_url: r.get("webhook_url"),
        webhook_secret: r.get("webhook_secret"),
        created_at: r.get("created_at"),
    }
}
