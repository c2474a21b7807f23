use rand::distributions::Alphanumeric;
use rand::Rng;

pub fn order_id() -> String {
    prefixed("order_", 16)
}

pub fn payment_id() -> String {
    prefixed("pay_", 16)
}

pub fn refund_id() -> String {
    prefixed("rfnd_", 16)
}

pub fn webhook_secret() -> String {
    prefixed("whsec_", 24)
}

pub fn api_key() -> String {
    prefixed("key_", 24)
}

pub fn api_secret() -> String {
    prefixed("secret_", 32)
}

pub fn prefixed(prefix: &str, len: usize) -> String {
    let body: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect();
    format!("{}{}", prefix, body)
}
