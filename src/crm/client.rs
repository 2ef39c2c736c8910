use crate::domain::call_log::HttpCallLog;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct CrmOutcome {
    pub status_code: Option<i32>,
    pub crm_id: Option<String>,
    pub error_message: Option<String>,
}

impl CrmOutcome {
    pub fn is_success(&self) -> bool {
        self.error_message.is_none()
            && self.status_code.map_or(false, |code| (200..300).contains(&code))
    }
}

#[derive(Clone)]
pub struct CrmClient {
    pub base_url: String,
    pub pagar_path: String,
    pub bearer_token: Option<String>,
    pub timeout_seconds: u64,
    pub client: reqwest::Client,
}

impl CrmClient {
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.pagar_path)
    }

    pub async fn send(&self, payload: &serde_json::Value) -> (CrmOutcome, HttpCallLog) {
        let url = self.endpoint();
        let mut request_headers = HashMap::new();
        request_headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(token) = &self.bearer_token {
            request_headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        let start = Instant::now();
        let mut request = self
            .client
            .post(&url)
            .json(payload)
            .timeout(std::time::Duration::from_secs(self.timeout_seconds));
        for (name, value) in &request_headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await;

        let mut log = HttpCallLog {
            request_url: url,
            request_headers,
            request_body: Some(payload.clone()),
            ..HttpCallLog::default()
        };

        let outcome = match response {
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

                let crm_id = match body.get("id") {
                    Some(serde_json::Value::String(id)) => Some(id.clone()),
                    Some(serde_json::Value::Number(id)) => Some(id.to_string()),
                    _ => None,
                };

                log.response_status = Some(status);
                log.response_headers = Some(response_headers);
                log.response_body = Some(body);

                CrmOutcome {
                    status_code: Some(status),
                    crm_id,
                    error_message: None,
                }
            }
            Err(err) => {
                log.error_message = Some(err.to_string());
                CrmOutcome {
                    status_code: None,
                    crm_id: None,
                    error_message: Some(err.to_string()),
                }
            }
        };

        log.latency_ms = start.elapsed().as_millis() as i64;
        (outcome, log)
    }
}
