use paygate::domain::payment::{
    infer_network, CardNetwork, CreatePaymentRequest, Instrument, PaymentMethod,
};

fn upi_request(vpa: Option<&str>) -> CreatePaymentRequest {
    CreatePaymentRequest {
        order_id: "order_x".to_string(),
        method: PaymentMethod::Upi,
        vpa: vpa.map(str::to_string),
        card_number: None,
        card_expiry: None,
        card_cvv: None,
    }
}

fn card_request(number: Option<&str>, expiry: Option<&str>, cvv: Option<&str>) -> CreatePaymentRequest {
    CreatePaymentRequest {
        order_id: "order_x".to_string(),
        method: PaymentMethod::Card,
        vpa: None,
        card_number: number.map(str::to_string),
        card_expiry: expiry.map(str::to_string),
        card_cvv: cvv.map(str::to_string),
    }
}

#[test]
fn network_inferred_from_first_digit() {
    assert_eq!(infer_network("4111111111111111"), CardNetwork::Visa);
    assert_eq!(infer_network("5555555555554444"), CardNetwork::Mastercard);
    assert_eq!(infer_network("6011000990139424"), CardNetwork::Unknown);
    assert_eq!(infer_network(""), CardNetwork::Unknown);
}

#[test]
fn upi_payment_requires_vpa() {
    assert!(Instrument::from_request(&upi_request(None)).is_err());
    assert!(Instrument::from_request(&upi_request(Some(""))).is_err());
    assert!(Instrument::from_request(&upi_request(Some("  "))).is_err());
}

#[test]
fn upi_payment_keeps_the_vpa() {
    let instrument = Instrument::from_request(&upi_request(Some("a@bank"))).unwrap();
    assert_eq!(
        instrument,
        Instrument::Upi {
            vpa: "a@bank".to_string()
        }
    );
}

#[test]
fn card_payment_requires_all_card_fields() {
    assert!(Instrument::from_request(&card_request(None, Some("12/30"), Some("123"))).is_err());
    assert!(
        Instrument::from_request(&card_request(Some("4111111111111111"), None, Some("123")))
            .is_err()
    );
    assert!(
        Instrument::from_request(&card_request(Some("4111111111111111"), Some("12/30"), None))
            .is_err()
    );
}

#[test]
fn card_payment_retains_only_last4_and_network() {
    let instrument = Instrument::from_request(&card_request(
        Some("4111111111111111"),
        Some("12/30"),
        Some("123"),
    ))
    .unwrap();
    assert_eq!(
        instrument,
        Instrument::Card {
            last4: "1111".to_string(),
            network: CardNetwork::Visa,
        }
    );
}

#[test]
fn mastercard_number_maps_to_mastercard() {
    let instrument = Instrument::from_request(&card_request(
        Some("5555555555554444"),
        Some("01/31"),
        Some("999"),
    ))
    .unwrap();
    assert!(matches!(
        instrument,
        Instrument::Card {
            network: CardNetwork::Mastercard,
            ..
        }
    ));
}

#[test]
fn malformed_card_numbers_are_rejected() {
    assert!(Instrument::from_request(&card_request(Some("411"), Some("12/30"), Some("123"))).is_err());
    assert!(Instrument::from_request(&card_request(
        Some("4111-1111-1111-1111"),
        Some("12/30"),
        Some("123")
    ))
    .is_err());
}
