use crate::domain::payment::{DeclineKind, DeclineReason, PaymentInstrument, TransactionId};
use crate::domain::ports::PaymentGateway;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

/// Test card number that is always declined.
pub const DECLINED_TEST_CARD: &str = "4000000000000002";

pub const DECLINE_MESSAGE: &str = "Your card was declined. Please try another payment method.";

pub const INCOMPLETE_CARD_MESSAGE: &str = "Card details are incomplete.";

/// A stand-in gateway that settles every charge except the reserved
/// test card, which it declines. Incomplete cards are rejected as invalid.
#[derive(Debug, Clone, Copy, Default)]
pub struct SandboxGateway;

impl SandboxGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    async fn charge(
        &self,
        amount: Decimal,
        instrument: &PaymentInstrument,
    ) -> Result<TransactionId, DeclineReason> {
        match instrument {
            PaymentInstrument::Card(card) if !card.is_complete() => Err(DeclineReason {
                kind: DeclineKind::Invalid,
                message: INCOMPLETE_CARD_MESSAGE.to_string(),
            }),
            PaymentInstrument::Card(card) if card.number_digits() == DECLINED_TEST_CARD => {
                tracing::debug!(%amount, last4 = %card.last4(), "sandbox decline");
                Err(DeclineReason::declined(DECLINE_MESSAGE))
            }
            PaymentInstrument::Card(card) => {
                tracing::debug!(%amount, last4 = %card.last4(), "sandbox charge");
                Ok(TransactionId(format!(
                    "txn_{}",
                    Utc::now().timestamp_millis()
                )))
            }
        }
    }
}
