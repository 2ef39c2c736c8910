use crate::domain::call_log::{headers_json, HttpCallLog};
use crate::domain::payment::{PaymentRow, PaymentStatus};
use crate::providers::ProviderStatusResult;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PaymentsSummary {
    pub total_payments: i64,
    pub authorized_payments: i64,
    pub total_amount_minor: i64,
    pub last_payment_at: Option<DateTime<Utc>>,
}

fn row_to_payment(row: sqlx::postgres::PgRow) -> Result<PaymentRow> {
    let status_raw: String = row.get("status");
    let status = PaymentStatus::parse(&status_raw)
        .ok_or_else(|| anyhow::anyhow!("unknown payment status in ledger: {status_raw}"))?;

    Ok(PaymentRow {
        id: row.get("id"),
        provider: row.get("provider"),
        token: row.get("token"),
        status,
        amount_minor: row.get("amount_minor"),
        context: row.get("context"),
        product_id: row.get("product_id"),
        authorization_code: row.get("authorization_code"),
        status_reason: row.get("status_reason"),
        created_at: row.get("created_at"),
        prior_checks: row.get("prior_checks"),
    })
}

pub async fn select_payments_for_reconciliation(
    tx: &mut Transaction<'_, Postgres>,
    providers: &[String],
    batch_size: i64,
    attempt_offsets: &[i64],
) -> Result<Vec<PaymentRow>> {
    let rows = sqlx::query(
        r#"
        WITH attempts AS (
            SELECT payment_id, COUNT(*) AS prior_checks
            FROM payments.status_check
            GROUP BY payment_id
        )
        SELECT
            p.id,
            p.provider,
            p.token,
            p.status,
            p.amount_minor,
            p.context,
            p.product_id,
            p.authorization_code,
            p.status_reason,
            p.created_at,
            COALESCE(a.prior_checks, 0) AS prior_checks
        FROM payments.payment AS p
        LEFT JOIN attempts a ON a.payment_id = p.id
        WHERE p.status IN ('PENDING', 'TO_CONFIRM')
          AND p.token IS NOT NULL
          AND p.provider = ANY($1)
          AND (
            COALESCE(a.prior_checks, 0) >= cardinality($3::bigint[])
            OR now() >= p.created_at + ($3::bigint[])[COALESCE(a.prior_checks, 0) + 1] * interval '1 second'
          )
        ORDER BY p.created_at ASC
        LIMIT $2
        FOR UPDATE OF p SKIP LOCKED
        "#,
    )
    .bind(providers)
    .bind(batch_size)
    .bind(attempt_offsets)
    .fetch_all(tx.as_mut())
    .await?;

    rows.into_iter().map(row_to_payment).collect()
}

pub async fn find_abandoned_payments(
    tx: &mut Transaction<'_, Postgres>,
    cutoff: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<PaymentRow>> {
    let rows = sqlx::query(
        r#"
        SELECT
            p.id,
            p.provider,
            p.token,
            p.status,
            p.amount_minor,
            p.context,
            p.product_id,
            p.authorization_code,
            p.status_reason,
            p.created_at,
            0::bigint AS prior_checks
        FROM payments.payment AS p
        WHERE p.status = 'PENDING'
          AND p.created_at <= $1
        ORDER BY p.created_at ASC
        LIMIT $2
        FOR UPDATE OF p SKIP LOCKED
        "#,
    )
    .bind(cutoff)
    .bind(limit)
    .fetch_all(tx.as_mut())
    .await?;

    rows.into_iter().map(row_to_payment).collect()
}

pub async fn record_status_check(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: i64,
    provider: &str,
    result: &ProviderStatusResult,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO payments.status_check (
            payment_id, provider, success, provider_status, mapped_status,
            response_code, raw_payload, error_message, requested_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
        "#,
    )
    .bind(payment_id)
    .bind(provider)
    .bind(result.success)
    .bind(result.provider_status.as_deref())
    .bind(result.mapped_status.map(|s| s.as_str()))
    .bind(result.response_code)
    .bind(result.raw_payload.clone())
    .bind(result.error_message.as_deref())
    .execute(tx.as_mut())
    .await?;

    Ok(())
}

pub async fn record_provider_event(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: i64,
    provider: &str,
    log: &HttpCallLog,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO payments.provider_event_log (
            payment_id, provider, request_url, request_headers, request_body,
            response_status, response_headers, response_body, error_message, latency_ms
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(payment_id)
    .bind(provider)
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

pub async fn update_payment_status(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: i64,
    new_status: PaymentStatus,
    status_reason: Option<&str>,
    authorization_code: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE payments.payment
        SET status = $2,
            status_reason = COALESCE($3, status_reason),
            authorization_code = COALESCE($4, authorization_code),
            updated_at = now(),
            first_authorized_at = CASE WHEN $2 = 'AUTHORIZED' THEN COALESCE(first_authorized_at, now()) ELSE first_authorized_at END,
            failed_at = CASE WHEN $2 = 'FAILED' THEN COALESCE(failed_at, now()) ELSE failed_at END,
            canceled_at = CASE WHEN $2 = 'CANCELED' THEN COALESCE(canceled_at, now()) ELSE canceled_at END,
            refunded_at = CASE WHEN $2 = 'REFUNDED' THEN COALESCE(refunded_at, now()) ELSE refunded_at END,
            abandoned_at = CASE WHEN $2 = 'ABANDONED' THEN COALESCE(abandoned_at, now()) ELSE abandoned_at END
        WHERE id = $1
        "#,
    )
    .bind(payment_id)
    .bind(new_status.as_str())
    .bind(status_reason)
    .bind(authorization_code)
    .execute(tx.as_mut())
    .await?;

    Ok(())
}

pub async fn mark_abandoned(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: i64,
    reason: &str,
) -> Result<()> {
    update_payment_status(tx, payment_id, PaymentStatus::Abandoned, Some(reason), None).await
}

pub async fn count_status_checks(
    tx: &mut Transaction<'_, Postgres>,
    payment_id: i64,
) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS checks FROM payments.status_check WHERE payment_id = $1")
        .bind(payment_id)
        .fetch_one(tx.as_mut())
        .await?;

    Ok(row.get("checks"))
}

impl PaymentsRepo {
    pub async fn payments_summary(&self) -> Result<PaymentsSummary> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_payments,
                COUNT(*) FILTER (WHERE status = 'AUTHORIZED') AS authorized_payments,
                COALESCE(SUM(amount_minor), 0)::bigint AS total_amount_minor,
                MAX(created_at) AS last_payment_at
            FROM payments.payment
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(PaymentsSummary {
            total_payments: row.get("total_payments"),
            authorized_payments: row.get("authorized_payments"),
            total_amount_minor: row.get("total_amount_minor"),
            last_payment_at: row.get("last_payment_at"),
        })
    }
}
