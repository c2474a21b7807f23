use crate::acquirer::{Acquirer, AcquirerOutcome};
use crate::config::AppConfig;
use crate::domain::payment::{Payment, PaymentMethod};
use async_trait::async_trait;
use rand::Rng;

pub const UPI_SUCCESS_RATE: f64 = 0.90;
pub const CARD_SUCCESS_RATE: f64 = 0.95;

/// Stands in for a real acquirer: sleeps a processing delay, then approves or
/// declines. Each roll is freshly random; test mode pins both.
pub struct SimulatedAcquirer {
    pub fixed_delay_ms: Option<u64>,
    pub forced_outcome: Option<bool>,
    pub upi_success_rate: f64,
    pub card_success_rate: f64,
}

impl SimulatedAcquirer {
    pub fn from_config(cfg: &AppConfig) -> Self {
        if cfg.test_mode {
            SimulatedAcquirer {
                fixed_delay_ms: Some(cfg.test_processing_delay_ms.unwrap_or(0)),
                forced_outcome: Some(cfg.test_payment_success.unwrap_or(true)),
                upi_success_rate: UPI_SUCCESS_RATE,
                card_success_rate: CARD_SUCCESS_RATE,
            }
        } else {
            SimulatedAcquirer {
                fixed_delay_ms: None,
                forced_outcome: None,
                upi_success_rate: UPI_SUCCESS_RATE,
                card_success_rate: CARD_SUCCESS_RATE,
            }
        }
    }
}

#[async_trait]
impl Acquirer for SimulatedAcquirer {
    async fn process(&self, payment: &Payment) -> AcquirerOutcome {
        let delay_ms = match self.fixed_delay_ms {
            Some(ms) => ms,
            None => rand::thread_rng().gen_range(5_000..=10_000),
        };
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;

        let approved = match self.forced_outcome {
            Some(forced) => forced,
            None => {
                let rate = match payment.method {
                    PaymentMethod::Upi => self.upi_success_rate,
                    PaymentMethod::Card => self.card_success_rate,
                };
                rand::thread_rng().gen_bool(rate)
            }
        };

        if approved {
            AcquirerOutcome::approved()
        } else {
            AcquirerOutcome::declined()
        }
    }
}
