use payments_reconciler::config::{csv_ints, csv_strings};

#[test]
fn csv_ints_splits_and_trims() {
    assert_eq!(csv_ints("60,180,900,1800"), vec![60, 180, 900, 1800]);
    assert_eq!(csv_ints(" 10 , 20 "), vec![10, 20]);
}

#[test]
fn csv_ints_drops_blanks_and_garbage() {
    assert_eq!(csv_ints("60,,abc,300"), vec![60, 300]);
    assert!(csv_ints("").is_empty());
}

#[test]
fn csv_strings_splits_and_trims() {
    assert_eq!(
        csv_strings("webpay, stripe ,paypal"),
        vec!["webpay".to_string(), "stripe".to_string(), "paypal".to_string()]
    );
}

#[test]
fn csv_strings_drops_blanks() {
    assert_eq!(csv_strings("webpay,,"), vec!["webpay".to_string()]);
    assert!(csv_strings("").is_empty());
}
