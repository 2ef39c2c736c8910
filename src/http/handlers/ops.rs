use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn health_metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(expected) = &state.config.health_auth_bearer {
        let provided = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim);

        match provided {
            None => {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({ "error": "missing bearer token" })),
                );
            }
            Some(token) if token != expected => {
                return (
                    StatusCode::FORBIDDEN,
                    Json(serde_json::json!({ "error": "invalid bearer token" })),
                );
            }
            Some(_) => {}
        }
    }

    let now = Utc::now();
    let uptime_seconds = (now - state.started_at).num_seconds();

    let (status_label, payments) = match state.payments_repo.payments_summary().await {
        Ok(summary) => ("ok", serde_json::to_value(summary).unwrap_or_default()),
        Err(err) => {
            tracing::error!("health metrics probe failed: {err:#}");
            ("degraded", serde_json::Value::Null)
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": status_label,
            "timestamp": now.to_rfc3339(),
            "uptime_seconds": uptime_seconds,
            "service": {
                "name": state.config.app_name,
                "polling_providers": state.config.reconcile_polling_providers,
                "pid": std::process::id(),
            },
            "payments": payments,
        })),
    )
}
