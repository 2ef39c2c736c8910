pub mod config;
pub mod crm {
    pub mod client;
    pub mod payload;
}
pub mod domain {
    pub mod call_log;
    pub mod payment;
}
pub mod http {
    pub mod handlers {
        pub mod ops;
    }
}
pub mod providers;
pub mod repo {
    pub mod crm_queue_repo;
    pub mod payments_repo;
    pub mod runtime_log_repo;
}
pub mod service {
    pub mod crm_sender;
    pub mod psp_poller;
    pub mod supervisor;
}

use chrono::{DateTime, Utc};

#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub payments_repo: repo::payments_repo::PaymentsRepo,
    pub started_at: DateTime<Utc>,
}
