use crate::domain::payment::Phase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketplaceError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Cannot {action} while payment is in the {phase} phase")]
    InvalidTransition { phase: Phase, action: &'static str },
    #[error("Payment session closed before reporting an outcome")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, MarketplaceError>;
