//! In-memory repository for tests. Mirrors the storage gateway contract,
//! including the four-predicate aggregate filter, so service and HTTP tests
//! can run without a database.

use super::ports::{
    AggregateFilter, NewSubscription, Subscription, SubscriptionPatch, SubscriptionRepository,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    rows: Mutex<BTreeMap<i64, Subscription>>,
    next_id: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl InMemorySubscriptionRepository {
    /// Number of times `create_subscription` was invoked
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of times `update_subscription` was invoked
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

fn matches(sub: &Subscription, filter: &AggregateFilter) -> bool {
    if let Some(from) = filter.date_from {
        if sub.start_date < from {
            return false;
        }
    }
    if let Some(to) = filter.date_to {
        // Open-ended subscriptions always satisfy the upper bound
        if let Some(end) = sub.end_date {
            if end > to {
                return false;
            }
        }
    }
    if let Some(user_id) = filter.user_id {
        if sub.user_id != user_id {
            return false;
        }
    }
    if let Some(ref service_name) = filter.service_name {
        if &sub.service_name != service_name {
            return false;
        }
    }
    true
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn get_subscription(&self, id: i64) -> anyhow::Result<Option<Subscription>> {
        Ok(self.rows.lock().expect("lock rows").get(&id).cloned())
    }

    async fn list_subscriptions(&self) -> anyhow::Result<Vec<Subscription>> {
        Ok(self
            .rows
            .lock()
            .expect("lock rows")
            .values()
            .cloned()
            .collect())
    }

    async fn create_subscription(&self, new: NewSubscription) -> anyhow::Result<i64> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.rows.lock().expect("lock rows").insert(
            id,
            Subscription {
                id,
                user_id: new.user_id,
                service_name: new.service_name,
                price: new.price,
                start_date: new.start_date,
                end_date: new.end_date,
            },
        );
        Ok(id)
    }

    async fn update_subscription(&self, id: i64, patch: SubscriptionPatch) -> anyhow::Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        // Zero rows affected is success, matching the SQL gateway
        if let Some(row) = self.rows.lock().expect("lock rows").get_mut(&id) {
            if let Some(user_id) = patch.user_id {
                row.user_id = user_id;
            }
            if let Some(service_name) = patch.service_name {
                row.service_name = service_name;
            }
            if let Some(price) = patch.price {
                row.price = price;
            }
            if let Some(start_date) = patch.start_date {
                row.start_date = start_date;
            }
            if let Some(end_date) = patch.end_date {
                row.end_date = Some(end_date);
            }
        }
        Ok(())
    }

    async fn delete_subscription(&self, id: i64) -> anyhow::Result<()> {
        self.rows.lock().expect("lock rows").remove(&id);
        Ok(())
    }

    async fn sum_subscriptions(&self, filter: AggregateFilter) -> anyhow::Result<i64> {
        Ok(self
            .rows
            .lock()
            .expect("lock rows")
            .values()
            .filter(|sub| matches(sub, &filter))
            .map(|sub| sub.price)
            .sum())
    }
}
