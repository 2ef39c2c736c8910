use std::collections::HashMap;

const HEADER_MASK: &str = "***";

#[derive(Debug, Clone, Default)]
pub struct HttpCallLog {
    pub request_url: String,
    pub request_headers: HashMap<String, String>,
    pub request_body: Option<serde_json::Value>,
    pub response_status: Option<i32>,
    pub response_headers: Option<HashMap<String, String>>,
    pub response_body: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub latency_ms: i64,
}

pub fn mask_sensitive_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let masked = matches!(
                name.to_ascii_lowercase().as_str(),
                "authorization" | "x-api-key" | "api-key" | "tbk-api-key-secret"
            );
            let value = if masked { HEADER_MASK.to_string() } else { value.clone() };
            (name.clone(), value)
        })
        .collect()
}

pub fn headers_json(headers: &HashMap<String, String>) -> serde_json::Value {
    serde_json::to_value(mask_sensitive_headers(headers)).unwrap_or(serde_json::Value::Null)
}
