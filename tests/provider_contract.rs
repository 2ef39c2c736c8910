use payments_reconciler::domain::payment::PaymentStatus;
use payments_reconciler::providers::mock::MockAdapter;
use payments_reconciler::providers::ProviderAdapter;

#[tokio::test]
async fn mock_adapter_authorizes_by_default() {
    let adapter = MockAdapter {
        behavior: "ALWAYS_AUTHORIZED".to_string(),
    };

    let (result, log) = adapter.status("tok_1", None).await;

    assert!(result.success);
    assert_eq!(result.provider_status.as_deref(), Some("succeeded"));
    assert_eq!(result.mapped_status, Some(PaymentStatus::Authorized));
    assert_eq!(result.authorization_code.as_deref(), Some("MOCK_AUTH"));
    assert_eq!(log.response_status, Some(200));
}

#[tokio::test]
async fn transport_failure_never_raises() {
    let adapter = MockAdapter {
        behavior: "ALWAYS_FAILURE".to_string(),
    };

    let (result, log) = adapter.status("tok_1", None).await;

    assert!(!result.success);
    assert!(result.provider_status.is_none());
    assert!(result.mapped_status.is_none());
    assert!(result.error_message.is_some());
    assert_eq!(log.error_message, result.error_message);
}

#[tokio::test]
async fn unknown_provider_status_is_not_a_transition() {
    let adapter = MockAdapter {
        behavior: "UNKNOWN_STATUS".to_string(),
    };

    let (result, _log) = adapter.status("tok_1", None).await;

    assert!(result.success);
    assert_eq!(result.provider_status.as_deref(), Some("weird"));
    assert!(result.mapped_status.is_none());
}
