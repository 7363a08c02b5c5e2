use crate::pool::DbPool;
use anyhow::Result;

/// Idempotent schema setup for the subscriptions table.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS subscriptions (
    id BIGSERIAL PRIMARY KEY,
    user_id UUID NOT NULL,
    service_name TEXT NOT NULL,
    price BIGINT NOT NULL CHECK (price >= 0),
    start_date DATE NOT NULL,
    end_date DATE
);

CREATE INDEX IF NOT EXISTS idx_subscriptions_user_id ON subscriptions (user_id);
CREATE INDEX IF NOT EXISTS idx_subscriptions_service_name ON subscriptions (service_name);
CREATE INDEX IF NOT EXISTS idx_subscriptions_start_date ON subscriptions (start_date);
"#;

pub async fn run(pool: &DbPool) -> Result<()> {
    tracing::info!("Running database migrations");

    let client = pool.get().await?;
    client.batch_execute(SCHEMA).await?;

    tracing::info!("Database migrations complete");
    Ok(())
}
