use super::creator::Creator;
use super::payment::{DeclineReason, PaymentInstrument, TransactionId};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Supplies the creator catalog to the query engine.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn all(&self) -> Result<Vec<Creator>>;
    async fn get(&self, creator_id: &str) -> Result<Option<Creator>>;
}

/// Charges a payment instrument. A real integration maps its result codes
/// onto `Ok(TransactionId)` or a `DeclineReason`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(
        &self,
        amount: Decimal,
        instrument: &PaymentInstrument,
    ) -> std::result::Result<TransactionId, DeclineReason>;
}

pub type CatalogSourceBox = Box<dyn CatalogSource>;
pub type PaymentGatewayHandle = Arc<dyn PaymentGateway>;
