use chrono::Utc;
use paygate::domain::payment::{CardNetwork, Payment, PaymentMethod, PaymentStatus};
use paygate::domain::refund::{Refund, RefundStatus};
use paygate::domain::webhook::{
    payment_event_data, refund_event_data, test_event_data, WebhookEnvelope,
};
use paygate::signing::{sign, verify};
use uuid::Uuid;

fn upi_payment() -> Payment {
    Payment {
        id: "pay_abc123".to_string(),
        merchant_id: Uuid::new_v4(),
        order_id: "order_xyz789".to_string(),
        amount: 50_000,
        currency: "INR".to_string(),
        method: PaymentMethod::Upi,
        vpa: Some("a@bank".to_string()),
        card_last4: None,
        card_network: None,
        status: PaymentStatus::Success,
        captured: false,
        error_code: None,
        error_description: None,
        created_at: Utc::now(),
    }
}

fn failed_card_payment() -> Payment {
    Payment {
        method: PaymentMethod::Card,
        vpa: None,
        card_last4: Some("1111".to_string()),
        card_network: Some(CardNetwork::Visa),
        status: PaymentStatus::Failed,
        error_code: Some("PAYMENT_FAILED".to_string()),
        error_description: Some("Payment processing failed".to_string()),
        ..upi_payment()
    }
}

#[test]
fn payment_event_carries_the_documented_fields() {
    let data = payment_event_data(&upi_payment());
    let payment = &data["payment"];

    assert_eq!(payment["id"], "pay_abc123");
    assert_eq!(payment["order_id"], "order_xyz789");
    assert_eq!(payment["amount"], 50_000);
    assert_eq!(payment["currency"], "INR");
    assert_eq!(payment["method"], "upi");
    assert_eq!(payment["vpa"], "a@bank");
    assert_eq!(payment["status"], "success");
    assert!(payment.get("error_code").is_none());
    assert!(payment.get("card_last4").is_none());
}

#[test]
fn failed_payment_event_carries_the_error() {
    let data = payment_event_data(&failed_card_payment());
    let payment = &data["payment"];

    assert_eq!(payment["status"], "failed");
    assert_eq!(payment["error_code"], "PAYMENT_FAILED");
    assert_eq!(payment["error_description"], "Payment processing failed");
    assert!(payment.get("vpa").is_none());
}

#[test]
fn refund_event_carries_the_documented_fields() {
    let now = Utc::now();
    let refund = Refund {
        id: "rfnd_def456".to_string(),
        payment_id: "pay_abc123".to_string(),
        merchant_id: Uuid::new_v4(),
        amount: 20_000,
        reason: Some("customer request".to_string()),
        status: RefundStatus::Processed,
        created_at: now,
        processed_at: Some(now),
    };
    let data = refund_event_data(&refund);
    let body = &data["refund"];

    assert_eq!(body["id"], "rfnd_def456");
    assert_eq!(body["payment_id"], "pay_abc123");
    assert_eq!(body["amount"], 20_000);
    assert_eq!(body["reason"], "customer request");
    assert_eq!(body["status"], "processed");
    assert!(!body["processed_at"].is_null());
}

#[test]
fn test_event_carries_the_fixed_message() {
    assert_eq!(
        test_event_data(),
        serde_json::json!({ "message": "This is a test webhook" })
    );
}

#[test]
fn signature_covers_the_exact_transmitted_bytes() {
    let data = payment_event_data(&upi_payment());
    let envelope = WebhookEnvelope {
        event: "payment.success",
        timestamp: 1_700_000_000,
        data: &data,
    };
    let body = serde_json::to_vec(&envelope).unwrap();
    let signature = sign("whsec_merchantsecret", &body);

    // What a merchant receiver does: recompute over the received body.
    assert!(verify("whsec_merchantsecret", &body, &signature));

    let mut tampered = body.clone();
    let last = tampered.len() - 2;
    tampered[last] ^= 1;
    assert!(!verify("whsec_merchantsecret", &tampered, &signature));
}
