use crate::config::AppConfig;
use crate::crm::payload::build_payload;
use crate::domain::payment::{PaymentRow, PaymentStatus};
use crate::providers::ProviderAdapter;
use crate::repo::crm_queue_repo::{self, OPERATION_PAGAR};
use crate::repo::payments_repo;
use crate::repo::runtime_log_repo::RuntimeLogRepo;
use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

pub const EXHAUSTED_REASON: &str = "reconcile attempts exhausted";
pub const TIMEOUT_REASON: &str = "abandoned timeout";

pub struct PspPoller {
    pub pool: PgPool,
    pub config: AppConfig,
    pub adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
    pub runtime_log: RuntimeLogRepo,
}

#[derive(Debug, Default)]
pub struct PollerStats {
    pub claimed: usize,
    pub updated: usize,
    pub enqueued: usize,
    pub abandoned: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub fn attempts_exhausted(checks: i64, attempt_offsets: &[i64]) -> bool {
    checks >= attempt_offsets.len() as i64
}

impl PspPoller {
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            providers = ?self.config.reconcile_polling_providers,
            "psp poller started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.tick().await {
                Ok(stats) => {
                    tracing::info!(
                        claimed = stats.claimed,
                        updated = stats.updated,
                        enqueued = stats.enqueued,
                        abandoned = stats.abandoned,
                        failed = stats.failed,
                        skipped = stats.skipped,
                        "psp poller cycle completed"
                    );
                }
                Err(err) => {
                    tracing::error!("psp poller cycle error: {err:#}");
                    if let Err(log_err) = self
                        .runtime_log
                        .log_event("LOOP_ERROR", json!({ "loop": "psp_poller", "error": err.to_string() }))
                        .await
                    {
                        tracing::warn!("failed to record loop error: {log_err:#}");
                    }
                }
            }

            tokio::select! {
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(std::time::Duration::from_secs(self.config.reconcile_interval_seconds)) => {}
            }
        }

        tracing::info!("psp poller stopped");
    }

    async fn tick(&self) -> Result<PollerStats> {
        let mut stats = PollerStats::default();
        let mut tx = self.pool.begin().await?;

        let payments = payments_repo::select_payments_for_reconciliation(
            &mut tx,
            &self.config.reconcile_polling_providers,
            self.config.reconcile_batch_size,
            &self.config.reconcile_attempt_offsets,
        )
        .await?;
        stats.claimed = payments.len();

        for payment in &payments {
            let mut sp = tx.begin().await?;
            match self.process_payment(&mut sp, payment, &mut stats).await {
                Ok(()) => sp.commit().await?,
                Err(err) => {
                    tracing::error!(payment_id = payment.id, "payment processing failed: {err:#}");
                    sp.rollback().await?;
                    stats.failed += 1;
                }
            }
        }

        let cutoff = Utc::now() - chrono::Duration::minutes(self.config.abandoned_timeout_minutes);
        let stale =
            payments_repo::find_abandoned_payments(&mut tx, cutoff, self.config.reconcile_batch_size)
                .await?;
        for payment in &stale {
            payments_repo::mark_abandoned(&mut tx, payment.id, TIMEOUT_REASON).await?;
            stats.abandoned += 1;
            tracing::info!(payment_id = payment.id, "payment abandoned after timeout");
        }

        tx.commit().await?;
        Ok(stats)
    }

    async fn process_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: &PaymentRow,
        stats: &mut PollerStats,
    ) -> Result<()> {
        let offsets = &self.config.reconcile_attempt_offsets;

        if attempts_exhausted(payment.prior_checks, offsets) {
            payments_repo::mark_abandoned(tx, payment.id, EXHAUSTED_REASON).await?;
            stats.abandoned += 1;
            tracing::warn!(
                payment_id = payment.id,
                provider = %payment.provider,
                "retry budget exhausted, payment abandoned"
            );
            return Ok(());
        }

        let adapter = match self.adapters.get(&payment.provider) {
            Some(adapter) => adapter,
            None => {
                tracing::warn!(
                    payment_id = payment.id,
                    provider = %payment.provider,
                    "no adapter configured for provider, skipping"
                );
                stats.skipped += 1;
                return Ok(());
            }
        };

        let token = match &payment.token {
            Some(token) => token.clone(),
            None => {
                stats.skipped += 1;
                return Ok(());
            }
        };

        let (result, call_log) = adapter.status(&token, payment.context.as_ref()).await;

        payments_repo::record_provider_event(tx, payment.id, &payment.provider, &call_log).await?;
        payments_repo::record_status_check(tx, payment.id, &payment.provider, &result).await?;

        if let Some(error) = &result.error_message {
            tracing::error!(
                payment_id = payment.id,
                provider = %payment.provider,
                "provider status check failed: {error}"
            );
        }

        match (result.success, result.mapped_status) {
            (true, Some(new_status)) if new_status != payment.status => {
                let reason = result
                    .status_reason
                    .clone()
                    .unwrap_or_else(|| "provider reconciliation update".to_string());
                payments_repo::update_payment_status(
                    tx,
                    payment.id,
                    new_status,
                    Some(&reason),
                    result.authorization_code.as_deref(),
                )
                .await?;
                stats.updated += 1;
                tracing::info!(
                    payment_id = payment.id,
                    provider = %payment.provider,
                    from = payment.status.as_str(),
                    to = new_status.as_str(),
                    "payment status updated"
                );

                if new_status == PaymentStatus::Authorized {
                    let mut updated = payment.clone();
                    updated.status = new_status;
                    if result.authorization_code.is_some() {
                        updated.authorization_code = result.authorization_code.clone();
                    }
                    let payload = build_payload(&updated);
                    crm_queue_repo::enqueue(tx, payment.id, OPERATION_PAGAR, &payload).await?;
                    stats.enqueued += 1;
                    tracing::info!(payment_id = payment.id, "crm notification enqueued");
                }
            }
            (true, Some(_)) => {}
            _ => {
                let checks = payments_repo::count_status_checks(tx, payment.id).await?;
                if attempts_exhausted(checks, offsets) {
                    payments_repo::mark_abandoned(tx, payment.id, EXHAUSTED_REASON).await?;
                    stats.abandoned += 1;
                    tracing::warn!(
                        payment_id = payment.id,
                        provider = %payment.provider,
                        "retry budget exhausted, payment abandoned"
                    );
                }
            }
        }

        Ok(())
    }
}
