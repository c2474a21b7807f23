use paygate::domain::ids;

#[test]
fn order_ids_carry_prefix_and_16_char_body() {
    let id = ids::order_id();
    assert!(id.starts_with("order_"));
    assert_eq!(id.len(), "order_".len() + 16);
}

#[test]
fn payment_and_refund_ids_carry_their_prefixes() {
    assert!(ids::payment_id().starts_with("pay_"));
    assert!(ids::refund_id().starts_with("rfnd_"));
    assert_eq!(ids::payment_id().len(), "pay_".len() + 16);
    assert_eq!(ids::refund_id().len(), "rfnd_".len() + 16);
}

#[test]
fn webhook_secrets_use_a_24_char_body() {
    let secret = ids::webhook_secret();
    assert!(secret.starts_with("whsec_"));
    assert_eq!(secret.len(), "whsec_".len() + 24);
}

#[test]
fn id_bodies_are_alphanumeric() {
    let id = ids::prefixed("x_", 64);
    assert!(id["x_".len()..].chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn consecutive_ids_differ() {
    assert_ne!(ids::order_id(), ids::order_id());
}
