use axum::routing::get;
use axum::Router;
use payments_reconciler::config::AppConfig;
use payments_reconciler::crm::client::CrmClient;
use payments_reconciler::http::handlers::ops;
use payments_reconciler::providers::build_adapters;
use payments_reconciler::repo::payments_repo::PaymentsRepo;
use payments_reconciler::repo::runtime_log_repo::RuntimeLogRepo;
use payments_reconciler::service::crm_sender::CrmSender;
use payments_reconciler::service::psp_poller::PspPoller;
use payments_reconciler::service::supervisor::Supervisor;
use payments_reconciler::AppState;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    tracing::info!(
        app = %cfg.app_name,
        reconcile_enabled = cfg.reconcile_enabled,
        crm_enabled = cfg.crm_enabled,
        "starting payments reconciler"
    );

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_dsn)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let adapters = build_adapters();
    let crm_client = CrmClient {
        base_url: cfg.crm_base_url.clone(),
        pagar_path: cfg.crm_pagar_path.clone(),
        bearer_token: cfg.crm_auth_bearer.clone(),
        timeout_seconds: cfg.crm_timeout_seconds,
        client: reqwest::Client::new(),
    };

    let runtime_log = RuntimeLogRepo::new(pool.clone());
    let poller = PspPoller {
        pool: pool.clone(),
        config: cfg.clone(),
        adapters,
        runtime_log: runtime_log.clone(),
    };
    let sender = CrmSender {
        pool: pool.clone(),
        config: cfg.clone(),
        client: crm_client,
        runtime_log: runtime_log.clone(),
    };

    let state = AppState {
        config: cfg.clone(),
        payments_repo: PaymentsRepo { pool: pool.clone() },
        started_at: chrono::Utc::now(),
    };
    let app = Router::new()
        .route("/health", get(ops::health))
        .route("/api/v1/health/metrics", get(ops::health_metrics))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, "health server listening");
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("health server error: {err}");
        }
    });

    Supervisor {
        config: cfg,
        runtime_log,
        poller,
        sender,
    }
    .run()
    .await
}
