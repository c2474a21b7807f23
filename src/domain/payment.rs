use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
        }
    }

    pub fn from_db(s: &str) -> PaymentMethod {
        match s {
            "upi" => PaymentMethod::Upi,
            _ => PaymentMethod::Card,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn from_db(s: &str) -> PaymentStatus {
        match s {
            "pending" => PaymentStatus::Pending,
            "success" => PaymentStatus::Success,
            _ => PaymentStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardNetwork {
    Visa,
    Mastercard,
    Unknown,
}

impl CardNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "visa",
            CardNetwork::Mastercard => "mastercard",
            CardNetwork::Unknown => "unknown",
        }
    }

    pub fn from_db(s: &str) -> CardNetwork {
        match s {
            "visa" => CardNetwork::Visa,
            "mastercard" => CardNetwork::Mastercard,
            _ => CardNetwork::Unknown,
        }
    }
}

pub fn infer_network(card_number: &str) -> CardNetwork {
    match card_number.chars().next() {
        Some('4') => CardNetwork::Visa,
        Some('5') => CardNetwork::Mastercard,
        _ => CardNetwork::Unknown,
    }
}

/// Method-specific details retained on the payment row. The full card number,
/// expiry and CVV never leave the create-payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instrument {
    Upi { vpa: String },
    Card { last4: String, network: CardNetwork },
}

impl Instrument {
    pub fn from_request(req: &CreatePaymentRequest) -> Result<Instrument, &'static str> {
        match req.method {
            PaymentMethod::Upi => {
                let vpa = req.vpa.as_deref().unwrap_or("").trim();
                if vpa.is_empty() {
                    return Err("vpa is required for upi payments");
                }
                Ok(Instrument::Upi { vpa: vpa.to_string() })
            }
            PaymentMethod::Card => {
                let number = req.card_number.as_deref().unwrap_or("").trim();
                let expiry = req.card_expiry.as_deref().unwrap_or("").trim();
                let cvv = req.card_cvv.as_deref().unwrap_or("").trim();
                if number.is_empty() || expiry.is_empty() || cvv.is_empty() {
                    return Err("card_number, card_expiry and card_cvv are required for card payments");
                }
                if number.len() < 4 || !number.chars().all(|c| c.is_ascii_digit()) {
                    return Err("card_number is invalid");
                }
                Ok(Instrument::Card {
                    last4: number[number.len() - 4..].to_string(),
                    network: infer_network(number),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: String,
    #[serde(skip_serializing)]
    pub merchant_id: Uuid,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_last4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_network: Option<CardNetwork>,
    pub status: PaymentStatus,
    pub captured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub order_id: String,
    pub method: PaymentMethod,
    #[serde(default)]
    pub vpa: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub card_expiry: Option<String>,
    #[serde(default)]
    pub card_cvv: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CapturePaymentRequest {
    // Accepted for wire compatibility; the full payment amount is always captured.
    #[serde(default)]
    pub amount: Option<i64>,
}
