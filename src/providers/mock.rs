use crate::domain::call_log::HttpCallLog;
use crate::domain::payment::PaymentStatus;
use crate::providers::{ProviderAdapter, ProviderStatusResult};
use std::collections::HashMap;

pub struct MockAdapter {
    pub behavior: String,
}

#[async_trait::async_trait]
impl ProviderAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn status(
        &self,
        token: &str,
        _context: Option<&serde_json::Value>,
    ) -> (ProviderStatusResult, HttpCallLog) {
        let url = format!("mock://status/{token}");
        let result = match self.behavior.as_str() {
            "ALWAYS_FAILURE" => ProviderStatusResult::transport_failure("mock transport failure"),
            "UNKNOWN_STATUS" => ProviderStatusResult {
                success: true,
                provider_status: Some("weird".to_string()),
                mapped_status: None,
                response_code: Some(200),
                raw_payload: Some(serde_json::json!({ "status": "weird" })),
                ..ProviderStatusResult::default()
            },
            _ => ProviderStatusResult {
                success: true,
                provider_status: Some("succeeded".to_string()),
                mapped_status: Some(PaymentStatus::Authorized),
                response_code: Some(200),
                raw_payload: Some(serde_json::json!({ "status": "succeeded" })),
                authorization_code: Some("MOCK_AUTH".to_string()),
                ..ProviderStatusResult::default()
            },
        };

        let log = HttpCallLog {
            request_url: url,
            request_headers: HashMap::new(),
            response_status: result.response_code,
            response_body: result.raw_payload.clone(),
            error_message: result.error_message.clone(),
            latency_ms: 0,
            ..HttpCallLog::default()
        };

        (result, log)
    }
}
