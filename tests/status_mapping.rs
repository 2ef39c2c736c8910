use payments_reconciler::domain::payment::PaymentStatus;
use payments_reconciler::providers::paypal::PaypalAdapter;
use payments_reconciler::providers::stripe::StripeAdapter;
use payments_reconciler::providers::webpay::WebpayAdapter;

#[test]
fn stripe_maps_documented_vocabulary() {
    assert_eq!(StripeAdapter::map_status("succeeded"), Some(PaymentStatus::Authorized));
    assert_eq!(StripeAdapter::map_status("requires_capture"), Some(PaymentStatus::Authorized));
    assert_eq!(StripeAdapter::map_status("processing"), Some(PaymentStatus::ToConfirm));
    assert_eq!(StripeAdapter::map_status("requires_action"), Some(PaymentStatus::ToConfirm));
    assert_eq!(StripeAdapter::map_status("requires_payment_method"), Some(PaymentStatus::Failed));
    assert_eq!(StripeAdapter::map_status("canceled"), Some(PaymentStatus::Canceled));
}

#[test]
fn stripe_is_case_insensitive() {
    assert_eq!(StripeAdapter::map_status("SUCCEEDED"), Some(PaymentStatus::Authorized));
}

#[test]
fn paypal_maps_documented_vocabulary() {
    assert_eq!(PaypalAdapter::map_status("COMPLETED"), Some(PaymentStatus::Authorized));
    assert_eq!(PaypalAdapter::map_status("APPROVED"), Some(PaymentStatus::ToConfirm));
    assert_eq!(PaypalAdapter::map_status("PAYER_ACTION_REQUIRED"), Some(PaymentStatus::ToConfirm));
    assert_eq!(PaypalAdapter::map_status("CREATED"), Some(PaymentStatus::Pending));
    assert_eq!(PaypalAdapter::map_status("VOIDED"), Some(PaymentStatus::Canceled));
}

#[test]
fn webpay_maps_documented_vocabulary() {
    assert_eq!(WebpayAdapter::map_status("AUTHORIZED"), Some(PaymentStatus::Authorized));
    assert_eq!(WebpayAdapter::map_status("FAILED"), Some(PaymentStatus::Failed));
    assert_eq!(WebpayAdapter::map_status("REJECTED"), Some(PaymentStatus::Failed));
    assert_eq!(WebpayAdapter::map_status("REVERSED"), Some(PaymentStatus::Canceled));
    assert_eq!(WebpayAdapter::map_status("NULLIFIED"), Some(PaymentStatus::Canceled));
    assert_eq!(WebpayAdapter::map_status("INITIALIZED"), Some(PaymentStatus::Pending));
}

#[test]
fn unknown_raw_statuses_map_to_none() {
    assert_eq!(StripeAdapter::map_status("weird"), None);
    assert_eq!(PaypalAdapter::map_status("weird"), None);
    assert_eq!(WebpayAdapter::map_status("weird"), None);
}

#[test]
fn terminal_statuses_are_sinks() {
    assert!(!PaymentStatus::Pending.is_terminal());
    assert!(!PaymentStatus::ToConfirm.is_terminal());
    assert!(PaymentStatus::Authorized.is_terminal());
    assert!(PaymentStatus::Failed.is_terminal());
    assert!(PaymentStatus::Canceled.is_terminal());
    assert!(PaymentStatus::Refunded.is_terminal());
    assert!(PaymentStatus::Abandoned.is_terminal());
}

#[test]
fn status_round_trips_through_its_wire_form() {
    for status in [
        PaymentStatus::Pending,
        PaymentStatus::ToConfirm,
        PaymentStatus::Authorized,
        PaymentStatus::Failed,
        PaymentStatus::Canceled,
        PaymentStatus::Refunded,
        PaymentStatus::Abandoned,
    ] {
        assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(PaymentStatus::parse("NOT_A_STATUS"), None);
}
