use crate::config::AppConfig;
use crate::repo::runtime_log_repo::RuntimeLogRepo;
use crate::service::crm_sender::CrmSender;
use crate::service::psp_poller::PspPoller;
use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tokio::sync::watch;

pub const SHUTDOWN_DEADLINE_SECS: u64 = 30;

pub struct Supervisor {
    pub config: AppConfig,
    pub runtime_log: RuntimeLogRepo,
    pub poller: PspPoller,
    pub sender: CrmSender,
}

impl Supervisor {
    pub async fn run(self) -> Result<()> {
        self.runtime_log
            .log_event(
                "STARTUP",
                json!({
                    "app": self.config.app_name,
                    "reconcile_enabled": self.config.reconcile_enabled,
                    "crm_enabled": self.config.crm_enabled,
                }),
            )
            .await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut handles = Vec::new();

        if self.config.reconcile_enabled {
            handles.push(tokio::spawn(self.poller.run(shutdown_rx.clone())));
        } else {
            tracing::info!("reconciliation disabled, psp poller not started");
        }

        if self.config.crm_enabled {
            handles.push(tokio::spawn(self.sender.run(shutdown_rx.clone())));
        } else {
            tracing::info!("crm integration disabled, crm sender not started");
        }

        let started_at = Utc::now();
        let signal = shutdown_signal();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                _ = &mut signal => break,
                _ = tokio::time::sleep(std::time::Duration::from_secs(self.config.heartbeat_interval_seconds)) => {
                    let uptime = (Utc::now() - started_at).num_seconds();
                    if let Err(err) = self
                        .runtime_log
                        .log_event("HEARTBEAT", json!({ "uptime_seconds": uptime }))
                        .await
                    {
                        tracing::warn!("failed to record heartbeat: {err:#}");
                    }
                }
            }
        }

        tracing::info!("shutdown signal received, stopping loops");
        let _ = shutdown_tx.send(true);

        for handle in handles {
            if tokio::time::timeout(
                std::time::Duration::from_secs(SHUTDOWN_DEADLINE_SECS),
                handle,
            )
            .await
            .is_err()
            {
                tracing::warn!("loop did not stop within the shutdown deadline");
            }
        }

        self.runtime_log
            .log_event("SHUTDOWN", json!({ "app": self.config.app_name }))
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
