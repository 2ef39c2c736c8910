use crate::domain::call_log::HttpCallLog;
use crate::domain::payment::PaymentStatus;
use crate::providers::{ProviderAdapter, ProviderStatusResult};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub struct CachedToken {
    pub access_token: String,
    pub expires_at: Instant,
}

pub struct PaypalAdapter {
    pub base_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub timeout_seconds: u64,
    pub client: reqwest::Client,
    pub token_cache: Mutex<Option<CachedToken>>,
}

impl PaypalAdapter {
    pub fn map_status(raw: &str) -> Option<PaymentStatus> {
        match raw.to_ascii_uppercase().as_str() {
            "COMPLETED" => Some(PaymentStatus::Authorized),
            "APPROVED" | "PAYER_ACTION_REQUIRED" => Some(PaymentStatus::ToConfirm),
            "CREATED" => Some(PaymentStatus::Pending),
            "VOIDED" => Some(PaymentStatus::Canceled),
            _ => None,
        }
    }

    async fn access_token(&self) -> Result<String, String> {
        let (client_id, client_secret) = match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => (id.clone(), secret.clone()),
            _ => return Err("paypal credentials are not configured".to_string()),
        };

        let mut cache = self.token_cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.access_token.clone());
            }
        }

        let token_url = format!("{}/v1/oauth2/token", self.base_url);
        let response = self
            .client
            .post(&token_url)
            .basic_auth(&client_id, Some(&client_secret))
            .form(&[("grant_type", "client_credentials")])
            .timeout(Duration::from_secs(self.timeout_seconds))
            .send()
            .await
            .map_err(|err| format!("token_error: {err}"))?;

        if !response.status().is_success() {
            return Err(format!("token_error: http {}", response.status().as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|err| format!("token_error: {err}"))?;
        let access_token = body
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| "token_error: missing access_token".to_string())?
            .to_string();
        let expires_in = body.get("expires_in").and_then(|v| v.as_u64()).unwrap_or(300);

        *cache = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(expires_in.saturating_sub(60)),
        });

        Ok(access_token)
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for PaypalAdapter {
    fn name(&self) -> &'static str {
        "paypal"
    }

    async fn status(
        &self,
        token: &str,
        _context: Option<&serde_json::Value>,
    ) -> (ProviderStatusResult, HttpCallLog) {
        let url = format!("{}/v2/checkout/orders/{}", self.base_url, token);
        let start = Instant::now();
        let mut request_headers = HashMap::new();
        request_headers.insert("Content-Type".to_string(), "application/json".to_string());

        let access_token = match self.access_token().await {
            Ok(token) => token,
            Err(error) => {
                let log = HttpCallLog {
                    request_url: url,
                    request_headers,
                    error_message: Some(error.clone()),
                    latency_ms: start.elapsed().as_millis() as i64,
                    ..HttpCallLog::default()
                };
                return (ProviderStatusResult::transport_failure(error), log);
            }
        };
        request_headers.insert("Authorization".to_string(), format!("Bearer {access_token}"));

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {access_token}"))
            .timeout(Duration::from_secs(self.timeout_seconds))
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
