use crate::domain::call_log::HttpCallLog;
use crate::domain::payment::PaymentStatus;
use crate::providers::{ProviderAdapter, ProviderStatusResult};
use std::collections::HashMap;
use std::time::Instant;

pub struct StripeAdapter {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub client: reqwest::Client,
}

impl StripeAdapter {
    fn status_url(&self, token: &str) -> String {
        if token.starts_with("ch_") {
            format!("{}/v1/charges/{}", self.base_url, token)
        } else {
            format!("{}/v1/payment_intents/{}", self.base_url, token)
        }
    }

    pub fn map_status(raw: &str) -> Option<PaymentStatus> {
        match raw.to_ascii_lowercase().as_str() {
            "succeeded" | "requires_capture" => Some(PaymentStatus::Authorized),
            "processing" | "requires_action" | "pending" => Some(PaymentStatus::ToConfirm),
            "requires_payment_method" | "failed" => Some(PaymentStatus::Failed),
            "canceled" => Some(PaymentStatus::Canceled),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for StripeAdapter {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn status(
        &self,
        token: &str,
        _context: Option<&serde_json::Value>,
    ) -> (ProviderStatusResult, HttpCallLog) {
        let url = self.status_url(token);
        let mut request_headers = HashMap::new();

        let api_key = match &self.api_key {
            Some(key) => key.clone(),
            None => {
                let error = "stripe api key is not configured";
                let log = HttpCallLog {
                    request_url: url,
                    request_headers,
                    error_message: Some(error.to_string()),
                    ..HttpCallLog::default()
                };
                return (ProviderStatusResult::transport_failure(error), log);
            }
        };
        request_headers.insert("Authorization".to_string(), format!("Bearer {api_key}"));

        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .timeout(std::time::Duration::from_secs(self.timeout_seconds))
            .send()
            .await;

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
                    authorization_code: None,
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
