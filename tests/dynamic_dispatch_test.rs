use async_trait::async_trait;
use creatorhub::application::catalog::CatalogService;
use creatorhub::application::payment::PaymentSession;
use creatorhub::config::{PaymentConfig, SessionTiming};
use creatorhub::domain::criteria::{FilterCriteria, SortMode};
use creatorhub::domain::payment::{
    DeclineKind, DeclineReason, PaymentEvent, PaymentInstrument, PaymentKind, PaymentRequest,
    Phase, TransactionId,
};
use creatorhub::domain::ports::{CatalogSourceBox, PaymentGateway, PaymentGatewayHandle};
use creatorhub::infrastructure::in_memory::InMemoryCatalog;
use creatorhub::infrastructure::sandbox_gateway::SandboxGateway;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fails every charge as if the processor were unreachable.
struct UnreachableGateway {
    attempts: AtomicUsize,
}

#[async_trait]
impl PaymentGateway for UnreachableGateway {
    async fn charge(
        &self,
        _amount: Decimal,
        _instrument: &PaymentInstrument,
    ) -> Result<TransactionId, DeclineReason> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DeclineReason {
            kind: DeclineKind::Network,
            message: "Payment processor unreachable".to_string(),
        })
    }
}

#[tokio::test]
async fn test_catalog_source_as_trait_object() {
    let source: CatalogSourceBox = Box::new(InMemoryCatalog::seeded().unwrap());

    // Verify Send + Sync by querying from a spawned task
    let handle = tokio::spawn(async move {
        let service = CatalogService::new(source);
        service
            .query("", &FilterCriteria::default().with_sort(SortMode::Rating))
            .await
            .unwrap()
    });

    let ids: Vec<String> = handle.await.unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[tokio::test]
async fn test_gateway_shared_between_sessions() {
    let gateway: PaymentGatewayHandle = Arc::new(SandboxGateway::new());
    let config = PaymentConfig::default().with_timing(SessionTiming::immediate());

    let mut handles = Vec::new();
    for (recipient, amount) in [("Isabella Rose", dec!(25)), ("Mia Rodriguez", dec!(40))] {
        let gateway = Arc::clone(&gateway);
        handles.push(tokio::spawn(async move {
            let request = PaymentRequest::new(PaymentKind::Tip, amount, recipient, None).unwrap();
            let (mut session, mut events) = PaymentSession::open(request, gateway, config);
            session.advance().await.unwrap();
            session
                .submit_card_fields("4242424242424242", "12/27", "123", "John Smith")
                .await
                .unwrap();
            session.advance().await.unwrap();
            events.recv().await
        }));
    }

    for handle in handles {
        assert!(matches!(
            handle.await.unwrap(),
            Some(PaymentEvent::Completed { .. })
        ));
    }
}

#[tokio::test]
async fn test_network_failure_moves_session_to_error() {
    let gateway = Arc::new(UnreachableGateway {
        attempts: AtomicUsize::new(0),
    });
    let handle: PaymentGatewayHandle = gateway.clone();
    let request = PaymentRequest::new(
        PaymentKind::CustomContent,
        dec!(100),
        "Sophia Chen",
        Some("Custom Artwork".to_string()),
    )
    .unwrap();
    let (mut session, mut events) = PaymentSession::open(
        request,
        handle,
        PaymentConfig::default().with_timing(SessionTiming::immediate()),
    );

    session.advance().await.unwrap();
    session
        .submit_card_fields("4242424242424242", "12/27", "123", "John Smith")
        .await
        .unwrap();
    session.advance().await.unwrap();

    assert_eq!(
        events.recv().await,
        Some(PaymentEvent::Declined {
            message: "Payment processor unreachable".to_string()
        })
    );
    assert_eq!(session.phase().await, Phase::Error);
    assert_eq!(
        session.last_error().await.as_deref(),
        Some("Payment processor unreachable")
    );

    // Retrying goes back to the card form with the card still filled in.
    session.retry().await.unwrap();
    assert_eq!(session.phase().await, Phase::Payment);
    assert!(session.card().await.is_complete());

    session.advance().await.unwrap();
    assert!(matches!(
        events.recv().await,
        Some(PaymentEvent::Declined { .. })
    ));
    assert_eq!(gateway.attempts.load(Ordering::SeqCst), 2);
}
