use crate::domain::payment::PaymentRow;
use serde_json::json;

fn context_str(context: Option<&serde_json::Value>, keys: &[&str]) -> Option<String> {
    let map = context?.as_object()?;
    for key in keys {
        if let Some(value) = map.get(*key) {
            match value {
                serde_json::Value::String(s) if !s.is_empty() => return Some(s.clone()),
                serde_json::Value::Number(n) => return Some(n.to_string()),
                _ => {}
            }
        }
    }
    None
}

fn sanitize_rut(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| *c != '.' && *c != '-').collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

pub fn build_payload(payment: &PaymentRow) -> serde_json::Value {
    let context = payment.context.as_ref();

    let rut = context_str(context, &["customer_rut", "rut"])
        .as_deref()
        .and_then(sanitize_rut);
    let name = context_str(context, &["customer_name", "name"])
        .unwrap_or_else(|| payment.provider.clone());
    let transaction_id = payment
        .authorization_code
        .clone()
        .or_else(|| payment.token.clone())
        .unwrap_or_else(|| payment.id.to_string());

    json!({
        "rutDepositante": rut,
        "nombreDepositante": name,
        "paymentMethod": payment.provider,
        "transactionId": transaction_id,
        "monto": payment.amount_minor.to_string(),
        "status": payment.status.as_str(),
        "authorizationCode": payment.authorization_code,
        "listContrato": [1],
        "listCuota": null,
    })
}
