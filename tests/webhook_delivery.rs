use paygate::domain::webhook::{
    after_attempt, backoff_ms, DeliveryDisposition, WebhookEnvelope, MAX_DELIVERY_ATTEMPTS,
};

#[test]
fn production_backoff_table() {
    assert_eq!(backoff_ms(1, false), Some(0));
    assert_eq!(backoff_ms(2, false), Some(60_000));
    assert_eq!(backoff_ms(3, false), Some(300_000));
    assert_eq!(backoff_ms(4, false), Some(1_800_000));
    assert_eq!(backoff_ms(5, false), Some(7_200_000));
}

#[test]
fn test_backoff_table() {
    assert_eq!(backoff_ms(1, true), Some(0));
    assert_eq!(backoff_ms(2, true), Some(5_000));
    assert_eq!(backoff_ms(3, true), Some(10_000));
    assert_eq!(backoff_ms(4, true), Some(15_000));
    assert_eq!(backoff_ms(5, true), Some(20_000));
}

#[test]
fn attempts_beyond_the_ceiling_have_no_backoff() {
    assert_eq!(backoff_ms(6, false), None);
    assert_eq!(backoff_ms(6, true), None);
    assert_eq!(backoff_ms(0, false), None);
}

#[test]
fn delivery_succeeds_on_any_attempt() {
    for attempts in 1..=MAX_DELIVERY_ATTEMPTS {
        assert_eq!(
            after_attempt(attempts, true, false),
            DeliveryDisposition::Delivered
        );
    }
}

#[test]
fn first_failure_schedules_the_second_attempt() {
    assert_eq!(
        after_attempt(1, false, false),
        DeliveryDisposition::RetryScheduled {
            next_attempt: 2,
            delay_ms: 60_000,
        }
    );
    assert_eq!(
        after_attempt(1, false, true),
        DeliveryDisposition::RetryScheduled {
            next_attempt: 2,
            delay_ms: 5_000,
        }
    );
}

#[test]
fn fifth_failure_exhausts_the_log() {
    assert_eq!(
        after_attempt(MAX_DELIVERY_ATTEMPTS, false, false),
        DeliveryDisposition::Exhausted
    );
}

#[test]
fn a_log_never_schedules_more_than_five_attempts() {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match after_attempt(attempts, false, true) {
            DeliveryDisposition::RetryScheduled { next_attempt, .. } => {
                assert_eq!(next_attempt, attempts + 1);
            }
            DeliveryDisposition::Exhausted => break,
            DeliveryDisposition::Delivered => unreachable!(),
        }
    }
    assert_eq!(attempts, MAX_DELIVERY_ATTEMPTS);
}

#[test]
fn envelope_serializes_event_timestamp_data_in_order() {
    let data = serde_json::json!({ "message": "This is a test webhook" });
    let envelope = WebhookEnvelope {
        event: "test.webhook",
        timestamp: 1_700_000_000,
        data: &data,
    };
    let body = serde_json::to_string(&envelope).unwrap();
    assert!(body.starts_with("{\"event\":\"test.webhook\",\"timestamp\":1700000000,\"data\":"));
}

#[test]
fn envelope_timestamp_is_an_integer() {
    let data = serde_json::json!({});
    let envelope = WebhookEnvelope {
        event: "payment.success",
        timestamp: 1_700_000_000,
        data: &data,
    };
    let value = serde_json::to_value(&envelope).unwrap();
    assert!(value["timestamp"].is_i64());
}
