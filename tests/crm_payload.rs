use chrono::Utc;
use payments_reconciler::crm::payload::build_payload;
use payments_reconciler::domain::payment::{PaymentRow, PaymentStatus};

fn payment(context: Option<serde_json::Value>) -> PaymentRow {
    PaymentRow {
        id: 42,
        provider: "webpay".to_string(),
        token: Some("tok_1".to_string()),
        status: PaymentStatus::Authorized,
        amount_minor: 5000,
        context,
        product_id: None,
        authorization_code: Some("AUTH-9".to_string()),
        status_reason: None,
        created_at: Utc::now(),
        prior_checks: 1,
    }
}

#[test]
fn payload_carries_amount_verbatim_and_canonical_status() {
    let payload = build_payload(&payment(None));

    assert_eq!(payload["monto"], "5000");
    assert_eq!(payload["status"], "AUTHORIZED");
    assert_eq!(payload["paymentMethod"], "webpay");
    assert_eq!(payload["authorizationCode"], "AUTH-9");
    assert_eq!(payload["listContrato"], serde_json::json!([1]));
    assert!(payload["listCuota"].is_null());
}

#[test]
fn customer_identifiers_come_from_context() {
    let payload = build_payload(&payment(Some(serde_json::json!({
        "customer_rut": "12.345.678-9",
        "customer_name": "Ada Lovelace",
    }))));

    assert_eq!(payload["rutDepositante"], "123456789");
    assert_eq!(payload["nombreDepositante"], "Ada Lovelace");
}

#[test]
fn name_falls_back_to_provider_when_context_is_missing() {
    let payload = build_payload(&payment(None));

    assert!(payload["rutDepositante"].is_null());
    assert_eq!(payload["nombreDepositante"], "webpay");
}

#[test]
fn transaction_id_prefers_authorization_code() {
    let payload = build_payload(&payment(None));
    assert_eq!(payload["transactionId"], "AUTH-9");

    let mut without_auth = payment(None);
    without_auth.authorization_code = None;
    let payload = build_payload(&without_auth);
    assert_eq!(payload["transactionId"], "tok_1");

    without_auth.token = None;
    let payload = build_payload(&without_auth);
    assert_eq!(payload["transactionId"], "42");
}

#[test]
fn builder_is_deterministic() {
    let row = payment(Some(serde_json::json!({ "customer_rut": "11.111.111-1" })));
    assert_eq!(build_payload(&row), build_payload(&row));
}
