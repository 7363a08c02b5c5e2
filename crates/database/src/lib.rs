pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, DbPool};

use anyhow::Result;
use repositories::PostgresSubscriptionRepository;
use services::subscription::SubscriptionRepository;
use std::sync::Arc;

/// Database service combining all repositories
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database service from a connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new database service from configuration
    pub async fn from_config(config: &config::DatabaseConfig) -> Result<Self> {
        let pool = create_pool(config)?;
        // Fail fast at startup when the database is unreachable
        pool.get().await?;
        Ok(Self::new(pool))
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        migrations::run(&self.pool).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn subscription_repository(&self) -> Arc<dyn SubscriptionRepository> {
        Arc::new(PostgresSubscriptionRepository::new(self.pool.clone()))
    }
}
