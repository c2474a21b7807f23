use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 over the exact bytes transmitted on the wire.
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("hmac-sha256 accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

pub fn verify(secret: &str, payload: &[u8], signature_hex: &str) -> bool {
    let expected = sign(secret, payload);
    expected.as_bytes().ct_eq(signature_hex.as_bytes()).into()
}

/// Constant-time equality for credential checks.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
