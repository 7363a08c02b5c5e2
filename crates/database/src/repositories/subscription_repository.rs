use crate::pool::DbPool;
use async_trait::async_trait;
use services::subscription::ports::{
    AggregateFilter, NewSubscription, Subscription, SubscriptionPatch, SubscriptionRepository,
};
use tokio_postgres::Row;

pub struct PostgresSubscriptionRepository {
    pool: DbPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_subscription(row: &Row) -> Subscription {
    Subscription {
        id: row.get("id"),
        user_id: row.get("user_id"),
        service_name: row.get("service_name"),
        price: row.get("price"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn get_subscription(&self, id: i64) -> anyhow::Result<Option<Subscription>> {
        tracing::debug!("Repository: Fetching subscription - id={}", id);

        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                "SELECT id, user_id, service_name, price, start_date, end_date
                 FROM subscriptions
                 WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn list_subscriptions(&self) -> anyhow::Result<Vec<Subscription>> {
        tracing::debug!("Repository: Fetching all subscriptions");

        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT id, user_id, service_name, price, start_date, end_date
                 FROM subscriptions
                 ORDER BY id",
                &[],
            )
            .await?;

        Ok(rows.iter().map(row_to_subscription).collect())
    }

    async fn create_subscription(&self, new: NewSubscription) -> anyhow::Result<i64> {
        tracing::info!(
            "Repository: Inserting subscription - user_id={}, service_name={}",
            new.user_id,
            new.service_name
        );

        let client = self.pool.get().await?;

        let row = client
            .query_one(
                "INSERT INTO subscriptions (user_id, service_name, price, start_date, end_date)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id",
                &[
                    &new.user_id,
                    &new.service_name,
                    &new.price,
                    &new.start_date,
                    &new.end_date,
                ],
            )
            .await?;

        Ok(row.get("id"))
    }

    async fn update_subscription(&self, id: i64, patch: SubscriptionPatch) -> anyhow::Result<()> {
        tracing::info!("Repository: Updating subscription - id={}", id);

        let client = self.pool.get().await?;

        // COALESCE keeps stored values for fields the patch does not carry.
        // Zero rows affected (unknown id) is not an error.
        client
            .execute(
                "UPDATE subscriptions
                 SET user_id = COALESCE($2, user_id),
                     service_name = COALESCE($3, service_name),
                     price = COALESCE($4, price),
                     start_date = COALESCE($5, start_date),
                     end_date = COALESCE($6, end_date)
                 WHERE id = $1",
                &[
                    &id,
                    &patch.user_id,
                    &patch.service_name,
                    &patch.price,
                    &patch.start_date,
                    &patch.end_date,
                ],
            )
            .await?;

        Ok(())
    }

    async fn delete_subscription(&self, id: i64) -> anyhow::Result<()> {
        tracing::info!("Repository: Deleting subscription - id={}", id);

        let client = self.pool.get().await?;

        client
            .execute("DELETE FROM subscriptions WHERE id = $1", &[&id])
            .await?;

        Ok(())
    }

    async fn sum_subscriptions(&self, filter: AggregateFilter) -> anyhow::Result<i64> {
        tracing::debug!(
            "Repository: Summing subscriptions - date_from={:?}, date_to={:?}, user_id={:?}, service_name={:?}",
            filter.date_from,
            filter.date_to,
            filter.user_id,
            filter.service_name
        );

        let client = self.pool.get().await?;

        // NULL parameters widen the match instead of narrowing it; open-ended
        // rows (end_date IS NULL) always satisfy the upper bound.
        let row = client
            .query_one(
                "SELECT COALESCE(SUM(price), 0)::BIGINT AS sum
                 FROM subscriptions
                 WHERE ($1::DATE IS NULL OR start_date >= $1)
                   AND ($2::DATE IS NULL OR end_date <= $2 OR end_date IS NULL)
                   AND ($3::UUID IS NULL OR user_id = $3)
                   AND ($4::TEXT IS NULL OR service_name = $4)",
                &[
                    &filter.date_from,
                    &filter.date_to,
                    &filter.user_id,
                    &filter.service_name,
                ],
            )
            .await?;

        Ok(row.get("sum"))
    }
}
