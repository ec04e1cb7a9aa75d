use crate::application::payment::PaymentSession;
use crate::config::PaymentConfig;
use crate::domain::payment::{
    PaymentEvent, PaymentKind, PaymentRequest, Quote, TipPercentage, TransactionId,
};
use crate::domain::ports::PaymentGatewayHandle;
use crate::error::{MarketplaceError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

/// Everything a client fills in for one payment, start to finish.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutOrder {
    pub kind: PaymentKind,
    pub amount: Decimal,
    pub recipient: String,
    pub service: Option<String>,
    /// Tip percentage, service bookings only.
    pub tip: Option<u8>,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub holder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutResult {
    Succeeded(TransactionId),
    Declined(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOutcome {
    pub recipient: String,
    pub kind: PaymentKind,
    pub quote: Quote,
    pub result: CheckoutResult,
}

/// Drives a payment session through every screen for a prepared order.
pub struct Checkout {
    gateway: PaymentGatewayHandle,
    config: PaymentConfig,
}

impl Checkout {
    pub fn new(gateway: PaymentGatewayHandle, config: PaymentConfig) -> Self {
        Self { gateway, config }
    }

    pub async fn run(&self, order: CheckoutOrder) -> Result<CheckoutOutcome> {
        let request = PaymentRequest::new(
            order.kind,
            order.amount,
            order.recipient.clone(),
            order.service.clone(),
        )?;
        let (mut session, mut events) =
            PaymentSession::open(request, Arc::clone(&self.gateway), self.config);

        if let Some(percent) = order.tip {
            session.select_tip(TipPercentage::try_from(percent)?).await?;
        }
        let quote = session.quote().await;

        session.advance().await?;
        session
            .submit_card_fields(&order.card_number, &order.expiry, &order.cvv, &order.holder)
            .await?;
        session.advance().await?;

        let result = match events.recv().await {
            Some(PaymentEvent::Completed { transaction_id }) => {
                CheckoutResult::Succeeded(transaction_id)
            }
            Some(PaymentEvent::Declined { message }) => {
                session.cancel().await;
                CheckoutResult::Declined(message)
            }
            None => return Err(MarketplaceError::SessionClosed),
        };

        Ok(CheckoutOutcome {
            recipient: order.recipient,
            kind: order.kind,
            quote,
            result,
        })
    }
}
