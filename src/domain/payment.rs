use super::money::Amount;
use crate::error::MarketplaceError;
use crate::format;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the client is paying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Tip,
    Service,
    VideoCall,
    CustomContent,
}

impl PaymentKind {
    /// Dialog title for the payment kind.
    pub fn title(&self) -> &'static str {
        match self {
            PaymentKind::Tip => "Send Tip",
            PaymentKind::Service => "Book Service",
            PaymentKind::VideoCall => "Schedule Video Call",
            PaymentKind::CustomContent => "Order Custom Content",
        }
    }

    /// Only service bookings offer an optional tip on top.
    pub fn accepts_tip(&self) -> bool {
        matches!(self, PaymentKind::Service)
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentKind::Tip => "tip",
            PaymentKind::Service => "service",
            PaymentKind::VideoCall => "video_call",
            PaymentKind::CustomContent => "custom_content",
        };
        f.write_str(name)
    }
}

/// Phases of a payment session.
///
/// `Details -> Payment -> Processing -> {Success | Error}`, with
/// `Payment -> Details` and `Error -> Payment` as the only backward moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Details,
    Payment,
    Processing,
    Success,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Details => "details",
            Phase::Payment => "payment",
            Phase::Processing => "processing",
            Phase::Success => "success",
            Phase::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
    BankTransfer,
}

impl PaymentMethod {
    /// Only cards can currently be charged.
    pub fn is_enabled(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }
}

/// Tip menu offered on service bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TipPercentage {
    #[default]
    None,
    Ten,
    Fifteen,
    Twenty,
}

impl TipPercentage {
    pub const MENU: [TipPercentage; 4] = [
        TipPercentage::None,
        TipPercentage::Ten,
        TipPercentage::Fifteen,
        TipPercentage::Twenty,
    ];

    pub fn percent(&self) -> u8 {
        match self {
            TipPercentage::None => 0,
            TipPercentage::Ten => 10,
            TipPercentage::Fifteen => 15,
            TipPercentage::Twenty => 20,
        }
    }
}

impl TryFrom<u8> for TipPercentage {
    type Error = MarketplaceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::MENU
            .into_iter()
            .find(|tip| tip.percent() == value)
            .ok_or_else(|| {
                MarketplaceError::ValidationError(format!(
                    "Tip must be one of 0, 10, 15 or 20 percent, got {value}"
                ))
            })
    }
}

impl From<TipPercentage> for u8 {
    fn from(tip: TipPercentage) -> Self {
        tip.percent()
    }
}

/// Card fields as typed into the payment form.
///
/// Setters only mask input (digits, grouping, `MM/YY`); no real card
/// validation takes place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardDetails {
    number: String,
    expiry: String,
    cvv: String,
    holder: String,
}

impl CardDetails {
    pub fn new(number: &str, expiry: &str, cvv: &str, holder: &str) -> Self {
        let mut card = Self::default();
        card.set_number(number);
        card.set_expiry(expiry);
        card.set_cvv(cvv);
        card.set_holder(holder);
        card
    }

    pub fn set_number(&mut self, raw: &str) {
        self.number = format::format_card_number(raw);
    }

    pub fn set_expiry(&mut self, raw: &str) {
        self.expiry = format::format_expiry(raw);
    }

    pub fn set_cvv(&mut self, raw: &str) {
        self.cvv = format::digits_only(raw, 4);
    }

    pub fn set_holder(&mut self, raw: &str) {
        self.holder = raw.to_string();
    }

    /// The number as displayed, grouped in blocks of four.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// The number with grouping removed.
    pub fn number_digits(&self) -> String {
        self.number.chars().filter(char::is_ascii_digit).collect()
    }

    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// All four fields carry a value. This is the only gate before charging.
    pub fn is_complete(&self) -> bool {
        !self.number.is_empty()
            && !self.expiry.is_empty()
            && !self.cvv.is_empty()
            && !self.holder.trim().is_empty()
    }

    /// Last four digits, for receipts and logs.
    pub fn last4(&self) -> String {
        let digits = self.number_digits();
        digits[digits.len().saturating_sub(4)..].to_string()
    }
}

/// What the gateway is asked to charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentInstrument {
    Card(CardDetails),
}

/// The fixed inputs a payment session is opened with.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub kind: PaymentKind,
    pub amount: Amount,
    pub recipient: String,
    pub service_label: Option<String>,
}

impl PaymentRequest {
    pub fn new(
        kind: PaymentKind,
        amount: Decimal,
        recipient: impl Into<String>,
        service_label: Option<String>,
    ) -> Result<Self, MarketplaceError> {
        Ok(Self {
            kind,
            amount: Amount::new(amount)?,
            recipient: recipient.into(),
            service_label,
        })
    }
}

/// Card-processing fee model: a percentage of the amount plus a fixed charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    pub rate: Decimal,
    pub fixed: Decimal,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            rate: dec!(0.029),
            fixed: dec!(0.30),
        }
    }
}

impl FeePolicy {
    pub fn platform_fee(&self, amount: Decimal) -> Decimal {
        amount * self.rate + self.fixed
    }
}

/// Derived totals for a payment. Always computed fresh from the current
/// amount and tip selection; never stored on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub amount: Decimal,
    pub platform_fee: Decimal,
    pub tip: Decimal,
    pub total: Decimal,
}

impl Quote {
    pub fn compute(
        kind: PaymentKind,
        amount: Amount,
        tip: TipPercentage,
        policy: &FeePolicy,
    ) -> Self {
        let amount = amount.value();
        let platform_fee = policy.platform_fee(amount);
        let tip = if kind.accepts_tip() {
            amount * Decimal::from(tip.percent()) / dec!(100)
        } else {
            Decimal::ZERO
        };
        Self {
            amount,
            platform_fee,
            tip,
            total: amount + platform_fee + tip,
        }
    }
}

/// Identifier a gateway returns for a settled charge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineKind {
    Declined,
    Network,
    Invalid,
}

/// Why a charge did not go through. Every gateway failure surfaces to the
/// session in this one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclineReason {
    pub kind: DeclineKind,
    pub message: String,
}

impl DeclineReason {
    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            kind: DeclineKind::Declined,
            message: message.into(),
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Notifications a session sends to whoever hosts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// The charge settled and the success screen has been shown.
    Completed { transaction_id: TransactionId },
    /// The charge failed; the session waits in the error phase.
    Declined { message: String },
}
