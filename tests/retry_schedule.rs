use chrono::{Duration, Utc};
use payments_reconciler::service::crm_sender::next_attempt_after;
use payments_reconciler::service::psp_poller::attempts_exhausted;

#[test]
fn backoff_walks_the_configured_schedule() {
    let backoff = [10, 20];
    let now = Utc::now();

    assert_eq!(next_attempt_after(1, &backoff, now), Some(now + Duration::seconds(10)));
    assert_eq!(next_attempt_after(2, &backoff, now), Some(now + Duration::seconds(20)));
    assert_eq!(next_attempt_after(3, &backoff, now), None);
}

#[test]
fn backoff_past_the_schedule_is_permanent() {
    let backoff = [60, 300, 1800];
    let now = Utc::now();

    assert_eq!(next_attempt_after(4, &backoff, now), None);
    assert_eq!(next_attempt_after(10, &backoff, now), None);
}

#[test]
fn zero_attempts_never_schedules() {
    let now = Utc::now();
    assert_eq!(next_attempt_after(0, &[60], now), None);
}

#[test]
fn poll_budget_exhausts_at_offsets_length() {
    let offsets = [60, 180, 900, 1800];

    assert!(!attempts_exhausted(0, &offsets));
    assert!(!attempts_exhausted(3, &offsets));
    assert!(attempts_exhausted(4, &offsets));
    assert!(attempts_exhausted(5, &offsets));
}

#[test]
fn empty_offsets_exhaust_immediately() {
    assert!(attempts_exhausted(0, &[]));
}
