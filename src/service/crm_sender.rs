use crate::config::AppConfig;
use crate::crm::client::CrmClient;
use crate::repo::crm_queue_repo::{self, CrmQueueItem};
use crate::repo::runtime_log_repo::RuntimeLogRepo;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use tokio::sync::watch;

pub struct CrmSender {
    pub pool: PgPool,
    pub config: AppConfig,
    pub client: CrmClient,
    pub runtime_log: RuntimeLogRepo,
}

#[derive(Debug, Default)]
pub struct SenderStats {
    pub reactivated: u64,
    pub sent: usize,
    pub failed: usize,
    pub errors: usize,
}

pub fn next_attempt_after(
    attempts: i32,
    backoff: &[i64],
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let index = usize::try_from(attempts).ok()?.checked_sub(1)?;
    backoff.get(index).map(|secs| now + chrono::Duration::seconds(*secs))
}

impl CrmSender {
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(endpoint = %self.client.endpoint(), "crm sender started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.tick().await {
                Ok(stats) => {
                    tracing::info!(
                        reactivated = stats.reactivated,
                        sent = stats.sent,
                        failed = stats.failed,
                        errors = stats.errors,
                        "crm sender cycle completed"
                    );
                }
                Err(err) => {
                    tracing::error!("crm sender cycle error: {err:#}");
                    if let Err(log_err) = self
                        .runtime_log
                        .log_event("LOOP_ERROR", json!({ "loop": "crm_sender", "error": err.to_string() }))
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

        tracing::info!("crm sender stopped");
    }

    async fn tick(&self) -> Result<SenderStats> {
        let mut stats = SenderStats::default();
        let mut tx = self.pool.begin().await?;

        stats.reactivated = crm_queue_repo::reactivate_due_failed(&mut tx).await?;

        let items = crm_queue_repo::claim_pending(&mut tx, self.config.reconcile_batch_size).await?;
        for item in &items {
            let mut sp = tx.begin().await?;
            match self.process_item(&mut sp, item).await {
                Ok(sent) => {
                    sp.commit().await?;
                    if sent {
                        stats.sent += 1;
                    } else {
                        stats.failed += 1;
                    }
                }
                Err(err) => {
                    tracing::error!(
                        queue_id = item.id,
                        payment_id = item.payment_id,
                        "crm item processing failed: {err:#}"
                    );
                    sp.rollback().await?;
                    stats.errors += 1;
                }
            }
        }

        tx.commit().await?;
        Ok(stats)
    }

    async fn process_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &CrmQueueItem,
    ) -> Result<bool> {
        let (outcome, call_log) = self.client.send(&item.payload).await;

        crm_queue_repo::record_crm_event(tx, item.payment_id, &item.operation, &call_log).await?;

        if outcome.is_success() {
            crm_queue_repo::mark_sent(
                tx,
                item.id,
                outcome.status_code.unwrap_or(200),
                outcome.crm_id.as_deref(),
            )
            .await?;
            tracing::info!(
                queue_id = item.id,
                payment_id = item.payment_id,
                operation = %item.operation,
                crm_id = outcome.crm_id.as_deref().unwrap_or_default(),
                "crm notification sent"
            );
            return Ok(true);
        }

        let attempts = item.attempts + 1;
        let next_attempt_at = next_attempt_after(attempts, &self.config.crm_retry_backoff, Utc::now());
        let error_message = outcome
            .error_message
            .clone()
            .unwrap_or_else(|| format!("crm responded with status {}", outcome.status_code.unwrap_or(0)));

        crm_queue_repo::mark_failed(
            tx,
            item.id,
            attempts,
            next_attempt_at,
            outcome.status_code,
            &error_message,
        )
        .await?;
        tracing::warn!(
            queue_id = item.id,
            payment_id = item.payment_id,
            attempts,
            permanent = next_attempt_at.is_none(),
            "crm notification failed: {error_message}"
        );

        Ok(false)
    }
}
