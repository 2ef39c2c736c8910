use crate::domain::call_log::{headers_json, HttpCallLog};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Row, Transaction};

pub const OPERATION_PAGAR: &str = "PAGAR";

#[derive(Debug, Clone)]
pub struct CrmQueueItem {
    pub id: i64,
    pub payment_id: i64,
    pub operation: String,
    pub attempts: i32,
    pub next_attempt_at: Option<DateTime<Utc>>,
    pub payload: serde_json::Value,
}

pub async fn enqueue(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: i64,
    operation: &str,
    payload: &serde_json::Value,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO payments.crm_push_queue (payment_id, operation, status, attempts, payload)
        VALUES ($1, $2, 'PENDING', 0, $3)
        ON CONFLICT (payment_id, operation) DO NOTHING
        "#,
    )
    .bind(payment_id)
    .bind(operation)
    .bind(payload)
    .execute(tx.as_mut())
    .await?;

    Ok(())
}

pub async fn reactivate_due_failed(tx: &mut Transaction<'_, Postgres>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        WITH due AS (
            SELECT id
            FROM payments.crm_push_queue
            WHERE status = 'FAILED'
              AND next_attempt_at IS NOT NULL
              AND next_attempt_at <= now()
            ORDER BY next_attempt_at ASC
            FOR UPDATE SKIP LOCKED
        )
        UPDATE payments.crm_push_queue AS q
        SET status = 'PENDING', updated_at = now()
        FROM due
        WHERE q.id = due.id
        "#,
    )
    .execute(tx.as_mut())
    .await?;

    Ok(result.rows_affected())
}

pub async fn claim_pending(
    tx: &mut Transaction<'_, Postgres>,
    batch_size: i64,
) -> Result<Vec<CrmQueueItem>> {
    let rows = sqlx::query(
        r#"
        SELECT id, payment_id, operation, attempts, next_attempt_at, payload
        FROM payments.crm_push_queue
        WHERE status = 'PENDING'
        ORDER BY created_at ASC
        LIMIT $1
        FOR UPDATE SKIP LOCKED
        "#,
    )
    .bind(batch_size)
    .fetch_all(tx.as_mut())
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| CrmQueueItem {
            id: row.get("id"),
            payment_id: row.get("payment_id"),
            operation: row.get("operation"),
            attempts: row.get("attempts"),
            next_attempt_at: row.get("next_attempt_at"),
            payload: row.get("payload"),
        })
        .collect())
}

pub async fn mark_sent(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    response_code: i32,
    crm_id: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE payments.crm_push_queue
        SET status = 'SENT',
            attempts = attempts + 1,
            last_attempt_at = now(),
            next_attempt_at = NULL,
            response_code = $2,
            crm_id = $3,
            last_error = NULL,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(response_code)
    .bind(crm_id)
    .execute(tx.as_mut())
    .await?;

    Ok(())
}

pub async fn mark_failed(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    attempts: i32,
    next_attempt_at: Option<DateTime<Utc>>,
    response_code: Option<i32>,
    error_message: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE payments.crm_push_queue
        SET status = 'FAILED',
            attempts = $2,
            next_attempt_at = $3,
            last_attempt_at = now(),
            response_code = $4,
            last_error = $5,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(attempts)
    .bind(next_attempt_at)
    .bind(response_code)
    .bind(error_message)
    .execute(tx.as_mut())
    .await?;

    Ok(())
}

pub async fn record_crm_event(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: i64,
    operation: &str,
    log: &HttpCallLog,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO payments.crm_event_log (
            payment_id, operation, request_url, request_headers, request_body,
            response_status, response_headers, response_body, error_message, latency_ms
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(payment_id)
    .bind(operation)
    .bind(&log.request_url)
    .bind(headers_json(&log.request_headers))
    .bind(log.request_body.clone())
    .bind(log.response_status)
    .bind(log.response_headers.as_ref().map(headers_json))
    .bind(log.response_body.clone())
    .bind(log.error_message.as_deref())
    .bind(log.latency_ms)
    .execute(tx.as_mut())
    .await?;

    Ok(())
}
