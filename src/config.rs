use crate::domain::payment::FeePolicy;
use std::time::Duration;

/// How long the payment dialog lingers on its automatic phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Simulated time spent in `processing` before the gateway is called.
    pub processing_delay: Duration,
    /// How long the success screen shows before the session completes.
    pub success_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(2000),
            success_delay: Duration::from_millis(2000),
        }
    }
}

impl SessionTiming {
    pub fn from_millis(processing_ms: u64, success_ms: u64) -> Self {
        Self {
            processing_delay: Duration::from_millis(processing_ms),
            success_delay: Duration::from_millis(success_ms),
        }
    }

    /// No delays; used by batch processing.
    pub fn immediate() -> Self {
        Self::from_millis(0, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaymentConfig {
    pub fee_policy: FeePolicy,
    pub timing: SessionTiming,
}

impl PaymentConfig {
    pub fn with_timing(self, timing: SessionTiming) -> Self {
        Self { timing, ..self }
    }
}
