use anyhow::Result;
use sqlx::PgPool;

#[derive(Clone)]
pub struct RuntimeLogRepo {
    pub pool: PgPool,
    pub instance_id: String,
}

impl RuntimeLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            instance_id: format!("reconciler-{}", uuid::Uuid::new_v4()),
        }
    }

    pub async fn log_event(&self, event_type: &str, payload: serde_json::Value) -> Result<()> {
        let host_name = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());

        sqlx::query(
            r#"
            INSERT INTO payments.service_runtime_log (instance_id, host_name, process_id, event_type, payload)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&self.instance_id)
        .bind(host_name)
        .bind(std::process::id() as i32)
        .bind(event_type)
        .bind(payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
