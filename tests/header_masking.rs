use payments_reconciler::domain::call_log::{headers_json, mask_sensitive_headers};
use std::collections::HashMap;

fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn sensitive_headers_are_masked() {
    let masked = mask_sensitive_headers(&headers(&[
        ("Authorization", "Bearer secret-token"),
        ("X-Api-Key", "key-1"),
        ("Api-Key", "key-2"),
        ("Tbk-Api-Key-Secret", "tbk-secret"),
    ]));

    assert_eq!(masked["Authorization"], "***");
    assert_eq!(masked["X-Api-Key"], "***");
    assert_eq!(masked["Api-Key"], "***");
    assert_eq!(masked["Tbk-Api-Key-Secret"], "***");
}

#[test]
fn masking_is_case_insensitive() {
    let masked = mask_sensitive_headers(&headers(&[
        ("authorization", "Bearer secret-token"),
        ("X-API-KEY", "key-1"),
    ]));

    assert_eq!(masked["authorization"], "***");
    assert_eq!(masked["X-API-KEY"], "***");
}

#[test]
fn other_headers_pass_through() {
    let masked = mask_sensitive_headers(&headers(&[
        ("Content-Type", "application/json"),
        ("Tbk-Commerce-Code", "597055555532"),
    ]));

    assert_eq!(masked["Content-Type"], "application/json");
    assert_eq!(masked["Tbk-Commerce-Code"], "597055555532");
}

#[test]
fn persisted_form_never_contains_the_secret() {
    let value = headers_json(&headers(&[("Authorization", "Bearer super-secret")]));
    let rendered = value.to_string();

    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("***"));
}
