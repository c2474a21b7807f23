use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Merchant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub api_key: String,
    pub api_secret: String,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MerchantProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub api_key: String,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Merchant> for MerchantProfile {
    fn from(m: Merchant) -> Self {
        MerchantProfile {
            id: m.id,
            name: m.name,
            email: m.email,
            api_key: m.api_key,
            webhook_url: m.webhook_url,
            webhook_secret: m.webhook_secret,
            created_at: m.created_at,
        }
    }
}
