pub mod simulated;

use crate::domain::payment::Payment;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct AcquirerOutcome {
    pub approved: bool,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
}

impl AcquirerOutcome {
    pub fn approved() -> Self {
        AcquirerOutcome {
            approved: true,
            error_code: None,
            error_description: None,
        }
    }

    pub fn declined() -> Self {
        AcquirerOutcome {
            approved: false,
            error_code: Some("PAYMENT_FAILED".to_string()),
            error_description: Some("Payment processing failed".to_string()),
        }
    }
}

#[async_trait]
pub trait Acquirer: Send + Sync {
    async fn process(&self, payment: &Payment) -> AcquirerOutcome;
}
