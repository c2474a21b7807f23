use paygate::signing::{secrets_match, sign, verify};

#[test]
fn matches_rfc_4231_test_vector() {
    // RFC 4231, test case 2.
    let signature = sign("Jefe", b"what do ya want for nothing?");
    assert_eq!(
        signature,
        "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
    );
}

#[test]
fn signatures_are_lowercase_hex() {
    let signature = sign("whsec_abc", b"{\"event\":\"test.webhook\"}");
    assert_eq!(signature.len(), 64);
    assert!(signature
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn verify_round_trips() {
    let payload = b"{\"event\":\"payment.success\",\"timestamp\":1700000000,\"data\":{}}";
    let signature = sign("whsec_secret", payload);
    assert!(verify("whsec_secret", payload, &signature));
}

#[test]
fn one_byte_change_flips_verification() {
    let payload = b"{\"amount\":50000}".to_vec();
    let signature = sign("whsec_secret", &payload);

    let mut tampered = payload.clone();
    tampered[2] ^= 1;
    assert!(!verify("whsec_secret", &tampered, &signature));
}

#[test]
fn wrong_secret_fails_verification() {
    let payload = b"{\"amount\":50000}";
    let signature = sign("whsec_secret", payload);
    assert!(!verify("whsec_other", payload, &signature));
}

#[test]
fn secrets_match_is_exact() {
    assert!(secrets_match("secret_abc", "secret_abc"));
    assert!(!secrets_match("secret_abc", "secret_abd"));
    assert!(!secrets_match("secret_abc", "secret_ab"));
}
