use super::ports::{
    AggregateFilter, NewSubscription, Subscription, SubscriptionError, SubscriptionPatch,
    SubscriptionRepository, SubscriptionService,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Domain service owning validation; storage access goes through the
/// constructor-injected repository handle.
pub struct SubscriptionServiceImpl {
    repository: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionServiceImpl {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    fn validate_price(price: i64) -> Result<(), SubscriptionError> {
        if price < 0 {
            return Err(SubscriptionError::Validation {
                field: "price",
                message: format!("price cannot be negative, got {}", price),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionService for SubscriptionServiceImpl {
    async fn get_subscription(&self, id: i64) -> Result<Subscription, SubscriptionError> {
        tracing::debug!("Fetching subscription id={}", id);

        self.repository
            .get_subscription(id)
            .await?
            .ok_or(SubscriptionError::NotFound(id))
    }

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, SubscriptionError> {
        tracing::debug!("Fetching subscriptions list");

        Ok(self.repository.list_subscriptions().await?)
    }

    async fn create_subscription(&self, new: NewSubscription) -> Result<i64, SubscriptionError> {
        tracing::info!(
            "Creating subscription for user_id={}, service_name={}, price={}",
            new.user_id,
            new.service_name,
            new.price
        );

        // Validation failures never reach storage
        Self::validate_price(new.price)?;

        let id = self.repository.create_subscription(new).await?;

        tracing::info!("Subscription created: id={}", id);
        Ok(id)
    }

    async fn update_subscription(
        &self,
        id: i64,
        patch: SubscriptionPatch,
    ) -> Result<(), SubscriptionError> {
        tracing::info!("Updating subscription id={}", id);

        if let Some(price) = patch.price {
            Self::validate_price(price)?;
        }

        if patch.is_empty() {
            tracing::debug!("Empty patch for subscription id={}, nothing to do", id);
            return Ok(());
        }

        Ok(self.repository.update_subscription(id, patch).await?)
    }

    async fn delete_subscription(&self, id: i64) -> Result<(), SubscriptionError> {
        tracing::info!("Deleting subscription id={}", id);

        Ok(self.repository.delete_subscription(id).await?)
    }

    async fn sum_subscriptions(&self, filter: AggregateFilter) -> Result<i64, SubscriptionError> {
        tracing::debug!(
            "Summing subscriptions: date_from={:?}, date_to={:?}, user_id={:?}, service_name={:?}",
            filter.date_from,
            filter.date_to,
            filter.user_id,
            filter.service_name
        );

        Ok(self.repository.sum_subscriptions(filter).await?)
    }
}
