use crate::config::PaymentConfig;
use crate::domain::payment::{
    CardDetails, PaymentEvent, PaymentInstrument, PaymentMethod, PaymentRequest, Phase, Quote,
    TipPercentage,
};
use crate::domain::ports::PaymentGatewayHandle;
use crate::error::{MarketplaceError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default)]
struct SessionState {
    phase: Phase,
    method: PaymentMethod,
    card: CardDetails,
    save_card: bool,
    tip: TipPercentage,
    last_error: Option<String>,
    /// Bumped on every reset so a timer scheduled before the reset can tell
    /// it no longer owns the session.
    generation: u64,
}

impl SessionState {
    fn reset(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::default()
        };
    }

    fn is_current(&self, generation: u64, phase: Phase) -> bool {
        self.generation == generation && self.phase == phase
    }
}

/// One payment attempt, from the details screen to a settled or declined
/// charge.
///
/// The session owns at most one pending timer (the simulated processing
/// delay, then the success screen delay). Cancelling or dropping the session
/// aborts it, so a closed dialog never receives a late transition.
pub struct PaymentSession {
    request: PaymentRequest,
    config: PaymentConfig,
    gateway: PaymentGatewayHandle,
    state: Arc<Mutex<SessionState>>,
    events: mpsc::UnboundedSender<PaymentEvent>,
    pending: Option<JoinHandle<()>>,
}

impl PaymentSession {
    /// Opens a session in the `details` phase. Outcomes are delivered on the
    /// returned receiver.
    pub fn open(
        request: PaymentRequest,
        gateway: PaymentGatewayHandle,
        config: PaymentConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PaymentEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        tracing::debug!(
            kind = %request.kind,
            title = request.kind.title(),
            amount = %request.amount,
            recipient = %request.recipient,
            "payment session opened"
        );
        let session = Self {
            request,
            config,
            gateway,
            state: Arc::new(Mutex::new(SessionState::default())),
            events,
            pending: None,
        };
        (session, receiver)
    }

    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase
    }

    /// Fee, tip and total for the current tip selection.
    pub async fn quote(&self) -> Quote {
        let tip = self.state.lock().await.tip;
        self.quote_with(tip)
    }

    fn quote_with(&self, tip: TipPercentage) -> Quote {
        Quote::compute(
            self.request.kind,
            self.request.amount,
            tip,
            &self.config.fee_policy,
        )
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    pub async fn card(&self) -> CardDetails {
        self.state.lock().await.card.clone()
    }

    pub async fn method(&self) -> PaymentMethod {
        self.state.lock().await.method
    }

    pub async fn tip(&self) -> TipPercentage {
        self.state.lock().await.tip
    }

    pub async fn save_card(&self) -> bool {
        self.state.lock().await.save_card
    }

    /// Picks a tip from the menu. Only service bookings take a tip, and only
    /// while the details screen is showing.
    pub async fn select_tip(&self, tip: TipPercentage) -> Result<()> {
        if !self.request.kind.accepts_tip() && tip != TipPercentage::None {
            return Err(MarketplaceError::ValidationError(format!(
                "A tip cannot be added to a {} payment",
                self.request.kind
            )));
        }
        let mut state = self.state.lock().await;
        require_phase(&state, Phase::Details, "change the tip")?;
        state.tip = tip;
        Ok(())
    }

    pub async fn select_method(&self, method: PaymentMethod) -> Result<()> {
        if !method.is_enabled() {
            return Err(MarketplaceError::ValidationError(
                "This payment method is not available yet".to_string(),
            ));
        }
        let mut state = self.state.lock().await;
        require_phase(&state, Phase::Payment, "change the payment method")?;
        state.method = method;
        Ok(())
    }

    pub async fn set_save_card(&self, save: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        require_phase(&state, Phase::Payment, "change card preferences")?;
        state.save_card = save;
        Ok(())
    }

    /// Replaces the card fields. Input is masked, not validated.
    pub async fn submit_card_fields(
        &self,
        number: &str,
        expiry: &str,
        cvv: &str,
        holder: &str,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        require_phase(&state, Phase::Payment, "edit card details")?;
        state.card = CardDetails::new(number, expiry, cvv, holder);
        Ok(())
    }

    /// Moves forward: `details -> payment`, or `payment -> processing` once
    /// every card field is filled in.
    pub async fn advance(&mut self) -> Result<()> {
        let mut state = self.state.lock().await;
        let phase = state.phase;
        match phase {
            Phase::Details => {
                state.phase = Phase::Payment;
                tracing::debug!("payment session: details -> payment");
                Ok(())
            }
            Phase::Payment => {
                if !state.method.is_enabled() {
                    return Err(MarketplaceError::ValidationError(
                        "This payment method is not available yet".to_string(),
                    ));
                }
                if !state.card.is_complete() {
                    return Err(MarketplaceError::ValidationError(
                        "Card number, expiry date, CVV and name on card are required".to_string(),
                    ));
                }

                state.phase = Phase::Processing;
                let total = self.quote_with(state.tip).total;
                let instrument = PaymentInstrument::Card(state.card.clone());
                let generation = state.generation;
                drop(state);

                tracing::debug!(%total, "payment session: payment -> processing");
                self.spawn_processing(generation, total, instrument);
                Ok(())
            }
            phase => Err(MarketplaceError::InvalidTransition {
                phase,
                action: "advance",
            }),
        }
    }

    /// `payment -> details`.
    pub async fn back(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        require_phase(&state, Phase::Payment, "go back")?;
        state.phase = Phase::Details;
        Ok(())
    }

    /// `error -> payment`, keeping the entered card so it can be corrected.
    pub async fn retry(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        require_phase(&state, Phase::Error, "retry")?;
        state.phase = Phase::Payment;
        state.last_error = None;
        Ok(())
    }

    /// Closes the dialog: aborts any pending timer and discards everything
    /// entered so far.
    pub async fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let mut state = self.state.lock().await;
        tracing::debug!(phase = %state.phase, "payment session cancelled");
        state.reset();
    }

    fn spawn_processing(&mut self, generation: u64, total: Decimal, instrument: PaymentInstrument) {
        let state = Arc::clone(&self.state);
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        let timing = self.config.timing;
        let recipient = self.request.recipient.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(timing.processing_delay).await;
            let outcome = gateway.charge(total, &instrument).await;

            let transaction_id = {
                let mut state = state.lock().await;
                if !state.is_current(generation, Phase::Processing) {
                    return;
                }
                match outcome {
                    Ok(transaction_id) => {
                        state.phase = Phase::Success;
                        transaction_id
                    }
                    Err(reason) => {
                        tracing::warn!(%recipient, kind = ?reason.kind, "payment declined: {reason}");
                        state.phase = Phase::Error;
                        state.last_error = Some(reason.message.clone());
                        let _ = events.send(PaymentEvent::Declined {
                            message: reason.message,
                        });
                        return;
                    }
                }
            };

            tokio::time::sleep(timing.success_delay).await;
            let mut state = state.lock().await;
            if !state.is_current(generation, Phase::Success) {
                return;
            }
            state.reset();
            tracing::info!(%recipient, %transaction_id, %total, "payment completed");
            let _ = events.send(PaymentEvent::Completed { transaction_id });
        });

        if let Some(previous) = self.pending.replace(task) {
            previous.abort();
        }
    }
}

impl Drop for PaymentSession {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

fn require_phase(state: &SessionState, expected: Phase, action: &'static str) -> Result<()> {
    if state.phase == expected {
        Ok(())
    } else {
        Err(MarketplaceError::InvalidTransition {
            phase: state.phase,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionTiming;
    use crate::domain::payment::PaymentKind;
    use crate::infrastructure::sandbox_gateway::{DECLINE_MESSAGE, SandboxGateway};
    use rust_decimal_macros::dec;
    use std::time::Duration;
    use tokio::sync::mpsc::error::TryRecvError;

    fn open(
        kind: PaymentKind,
        amount: Decimal,
    ) -> (PaymentSession, mpsc::UnboundedReceiver<PaymentEvent>) {
        let request = PaymentRequest::new(kind, amount, "Isabella Rose", None).unwrap();
        PaymentSession::open(
            request,
            Arc::new(SandboxGateway::new()),
            PaymentConfig::default(),
        )
    }

    async fn enter_card(session: &mut PaymentSession, number: &str) {
        session.advance().await.unwrap();
        session
            .submit_card_fields(number, "1227", "123", "John Doe")
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_payment_completes_and_resets() {
        let (mut session, mut events) = open(PaymentKind::Service, dec!(100));
        assert_eq!(session.request().recipient, "Isabella Rose");
        assert_eq!(session.request().amount.value(), dec!(100));
        session.select_tip(TipPercentage::Ten).await.unwrap();

        let quote = session.quote().await;
        assert_eq!(quote.platform_fee, dec!(3.20));
        assert_eq!(quote.tip, dec!(10.00));
        assert_eq!(quote.total, dec!(113.20));

        enter_card(&mut session, "4242 4242 4242 4242").await;
        session.advance().await.unwrap();
        assert_eq!(session.phase().await, Phase::Processing);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(session.phase().await, Phase::Success);

        match events.recv().await {
            Some(PaymentEvent::Completed { transaction_id }) => {
                assert!(transaction_id.0.starts_with("txn_"))
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(session.phase().await, Phase::Details);
        assert_eq!(session.tip().await, TipPercentage::None);
        assert!(!session.card().await.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_declined_card_then_retry() {
        let (mut session, mut events) = open(PaymentKind::Tip, dec!(50));
        enter_card(&mut session, "4000000000000002").await;
        session.advance().await.unwrap();

        assert_eq!(
            events.recv().await,
            Some(PaymentEvent::Declined {
                message: DECLINE_MESSAGE.to_string()
            })
        );
        assert_eq!(session.phase().await, Phase::Error);
        assert_eq!(session.last_error().await.as_deref(), Some(DECLINE_MESSAGE));

        session.retry().await.unwrap();
        assert_eq!(session.phase().await, Phase::Payment);
        assert!(session.last_error().await.is_none());
        assert_eq!(session.card().await.number(), "4000 0000 0000 0002");

        session
            .submit_card_fields("4242424242424242", "12/27", "123", "John Doe")
            .await
            .unwrap();
        session.advance().await.unwrap();
        assert!(matches!(
            events.recv().await,
            Some(PaymentEvent::Completed { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_card_blocks_processing() {
        let (mut session, _events) = open(PaymentKind::VideoCall, dec!(80));
        session.advance().await.unwrap();
        session
            .submit_card_fields("4242424242424242", "12/27", "", "John Doe")
            .await
            .unwrap();

        assert!(matches!(
            session.advance().await,
            Err(MarketplaceError::ValidationError(_))
        ));
        assert_eq!(session.phase().await, Phase::Payment);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_phases_only_via_processing() {
        let (mut session, _events) = open(PaymentKind::Tip, dec!(20));
        assert!(matches!(
            session.retry().await,
            Err(MarketplaceError::InvalidTransition {
                phase: Phase::Details,
                ..
            })
        ));
        assert!(session.back().await.is_err());

        enter_card(&mut session, "4242424242424242").await;
        session.back().await.unwrap();
        assert_eq!(session.phase().await, Phase::Details);
        session.advance().await.unwrap();
        assert_eq!(session.card().await.number(), "4242 4242 4242 4242");

        session.advance().await.unwrap();
        assert!(matches!(
            session.advance().await,
            Err(MarketplaceError::InvalidTransition {
                phase: Phase::Processing,
                ..
            })
        ));
        assert!(session.submit_card_fields("1", "1", "1", "x").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_processing_discards_outcome() {
        let (mut session, mut events) = open(PaymentKind::Tip, dec!(50));
        enter_card(&mut session, "4000000000000002").await;
        session.advance().await.unwrap();

        session.cancel().await;
        assert_eq!(session.phase().await, Phase::Details);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(session.phase().await, Phase::Details);
        assert!(session.last_error().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_on_success_screen_skips_completion() {
        let (mut session, mut events) = open(PaymentKind::Tip, dec!(50));
        enter_card(&mut session, "4242424242424242").await;
        session.advance().await.unwrap();

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(session.phase().await, Phase::Success);
        session.cancel().await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_session_aborts_timer() {
        let (mut session, mut events) = open(PaymentKind::Tip, dec!(50));
        enter_card(&mut session, "4242424242424242").await;
        session.advance().await.unwrap();
        drop(session);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test]
    async fn test_tip_only_for_service() {
        let (session, _events) = open(PaymentKind::CustomContent, dec!(100));
        assert!(matches!(
            session.select_tip(TipPercentage::Fifteen).await,
            Err(MarketplaceError::ValidationError(_))
        ));
        session.select_tip(TipPercentage::None).await.unwrap();
        assert_eq!(session.quote().await.tip, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_quote_follows_tip_selection() {
        let (session, _events) = open(PaymentKind::Service, dec!(40));
        session.select_tip(TipPercentage::Twenty).await.unwrap();
        assert_eq!(session.quote().await.total, dec!(49.46));
        session.select_tip(TipPercentage::None).await.unwrap();
        assert_eq!(session.quote().await.total, dec!(41.46));
    }

    #[tokio::test]
    async fn test_placeholder_methods_rejected() {
        let (mut session, _events) = open(PaymentKind::Tip, dec!(5));
        session.advance().await.unwrap();
        assert!(session.select_method(PaymentMethod::Paypal).await.is_err());
        session.select_method(PaymentMethod::Card).await.unwrap();
        session.set_save_card(true).await.unwrap();
        assert!(session.save_card().await);
        assert_eq!(session.method().await, PaymentMethod::Card);
    }

    #[tokio::test]
    async fn test_immediate_timing() {
        let request = PaymentRequest::new(PaymentKind::Tip, dec!(5), "Mia", None).unwrap();
        let config = PaymentConfig::default().with_timing(SessionTiming::immediate());
        let (mut session, mut events) =
            PaymentSession::open(request, Arc::new(SandboxGateway::new()), config);
        enter_card(&mut session, "4242424242424242").await;
        session.advance().await.unwrap();
        assert!(matches!(
            events.recv().await,
            Some(PaymentEvent::Completed { .. })
        ));
    }
}
