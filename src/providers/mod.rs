use crate::domain::call_log::HttpCallLog;
use crate::domain::payment::PaymentStatus;
use std::collections::HashMap;
use std::sync::Arc;

pub mod mock;
pub mod paypal;
pub mod stripe;
pub mod webpay;

#[derive(Debug, Clone, Default)]
pub struct ProviderStatusResult {
    pub success: bool,
    pub provider_status: Option<String>,
    pub mapped_status: Option<PaymentStatus>,
    pub response_code: Option<i32>,
    pub raw_payload: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub authorization_code: Option<String>,
    pub status_reason: Option<String>,
}

impl ProviderStatusResult {
    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(error.into()),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn status(
        &self,
        token: &str,
        context: Option<&serde_json::Value>,
    ) -> (ProviderStatusResult, HttpCallLog);
}

pub fn build_adapters() -> HashMap<String, Arc<dyn ProviderAdapter>> {
    let mut adapters: HashMap<String, Arc<dyn ProviderAdapter>> = HashMap::new();

    adapters.insert(
        "stripe".to_string(),
        Arc::new(stripe::StripeAdapter {
            base_url: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            api_key: std::env::var("STRIPE_API_KEY").ok().filter(|v| !v.is_empty()),
            timeout_seconds: 10,
            client: reqwest::Client::new(),
        }),
    );

    adapters.insert(
        "paypal".to_string(),
        Arc::new(paypal::PaypalAdapter {
            base_url: std::env::var("PAYPAL_BASE_URL")
                .unwrap_or_else(|_| "https://api-m.sandbox.paypal.com".to_string()),
            client_id: std::env::var("PAYPAL_CLIENT_ID").ok().filter(|v| !v.is_empty()),
            client_secret: std::env::var("PAYPAL_CLIENT_SECRET").ok().filter(|v| !v.is_empty()),
            timeout_seconds: 10,
            client: reqwest::Client::new(),
            token_cache: tokio::sync::Mutex::new(None),
        }),
    );

    adapters.insert(
        "webpay".to_string(),
        Arc::new(webpay::WebpayAdapter {
            status_url_template: std::env::var("WEBPAY_STATUS_URL_TEMPLATE").unwrap_or_else(|_| {
                "https://webpay3gint.transbank.cl/rswebpaytransaction/api/webpay/v1.2/transactions/{token}"
                    .to_string()
            }),
            api_key_id: std::env::var("WEBPAY_API_KEY_ID").ok().filter(|v| !v.is_empty()),
            api_key_secret: std::env::var("WEBPAY_API_KEY_SECRET").ok().filter(|v| !v.is_empty()),
            commerce_code: std::env::var("WEBPAY_COMMERCE_CODE").ok().filter(|v| !v.is_empty()),
            timeout_seconds: 10,
            client: reqwest::Client::new(),
        }),
    );

    adapters.insert(
        "mock".to_string(),
        Arc::new(mock::MockAdapter {
            behavior: std::env::var("MOCK_PROVIDER_BEHAVIOR")
                .unwrap_or_else(|_| "ALWAYS_AUTHORIZED".to_string()),
        }),
    );

    adapters
}
