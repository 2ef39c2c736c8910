use crate::domain::call_log::HttpCallLog;
use crate::domain::payment::PaymentStatus;
use crate::providers::{ProviderAdapter, ProviderStatusResult};
use std::collections::HashMap;
use std::time::Instant;

pub struct WebpayAdapter {
    pub status_url_template: String,
    pub api_key_id: Option<String>,
    pub api_key_secret: Option<String>,
    pub commerce_code: Option<String>,
    pub timeout_seconds: u64,
    pub client: reqwest::Client,
}

impl WebpayAdapter {
    pub fn map_status(raw: &str) -> Option<PaymentStatus> {
        match raw.to_ascii_uppercase().as_str() {
            "AUTHORIZED" => Some(PaymentStatus::Authorized),
            "FAILED" | "REJECTED" => Some(PaymentStatus::Failed),
            "REVERSED" | "NULLIFIED" => Some(PaymentStatus::Canceled),
            "PENDING" | "INITIALIZED" => Some(PaymentStatus::Pending),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for WebpayAdapter {
    fn name(&self) -> &'static str {
        "webpay"
    }

    async fn status(
        &self,
        token: &str,
        _context: Option<&serde_json::Value>,
    ) -> (ProviderStatusResult, HttpCallLog) {
        let url = self.status_url_template.replace("{token}", token);
        let mut request_headers = HashMap::new();
        request_headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(id) = &self.api_key_id {
            request_headers.insert("Tbk-Api-Key-Id".to_string(), id.clone());
        }
        if let Some(secret) = &self.api_key_secret {
            request_headers.insert("Tbk-Api-Key-Secret".to_string(), secret.clone());
        }
        if let Some(code) = &self.commerce_code {
            request_headers.insert("Tbk-Commerce-Code".to_string(), code.clone());
        }

        let start = Instant::now();
        let mut request = self
            .client
            .get(&url)
            .timeout(std::time::Duration::from_secs(self.timeout_seconds));
        for (name, value) in &request_headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await;

        let mut log = HttpCallLog {
            request_url: url,
            request_headers,
            ..HttpCallLog::default()
        };

        let result = match response {
            Ok(resp) => {
                let status = resp.status().as_u16() as i32;
                let response_headers: HashMap<String, String> = resp
                    .headers()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
                    .collect();
                let text = resp.text().await.unwrap_or_default();
                let body: serde_json::Value = serde_json::from_str(&text)
                    .unwrap_or_else(|_| serde_json::json!({ "raw": text }));

                let provider_status = body
                    .get("status")
                    .and_then(|s| s.as_str())
                    .map(str::to_string);
                let mapped_status = provider_status.as_deref().and_then(Self::map_status);
                let authorization_code = body
                    .get("authorization_code")
                    .and_then(|c| c.as_str())
                    .map(str::to_string);

                log.response_status = Some(status);
                log.response_headers = Some(response_headers);
                log.response_body = Some(body.clone());

                ProviderStatusResult {
                    success: true,
                    provider_status,
                    mapped_status,
                    response_code: Some(status),
                    raw_payload: Some(body),
                    error_message: None,
                    authorization_code,
                    status_reason: None,
                }
            }
            Err(err) => {
                log.error_message = Some(err.to_string());
                ProviderStatusResult::transport_failure(err.to_string())
            }
        };

        log.latency_ms = start.elapsed().as_millis() as i64;
        log.error_message = result.error_message.clone();
        (result, log)
    }
}
