use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A tracked subscription to a paid service.
///
/// Dates carry month precision: `start_date` and `end_date` are always
/// anchored to the first day of their month. `end_date = None` means the
/// subscription is open-ended (still active).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Assigned by the storage gateway on insert; immutable afterwards.
    pub id: i64,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Candidate subscription for creation. The id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Partial update with explicit per-field presence: a `None` field is left
/// untouched by the storage gateway, a `Some` field overwrites the stored
/// value. This replaces the zero-value-means-unsupplied convention so that
/// price can be intentionally reset to 0 or a service renamed to anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.service_name.is_none()
            && self.price.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Filter template for the cost-aggregation query. Absent fields widen the
/// match: no user means any user, no service means any service. At least one
/// date bound must be supplied by the caller; that precondition is checked at
/// the transport boundary, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateFilter {
    /// Lower bound, inclusive: matches subscriptions with `start_date >= date_from`.
    pub date_from: Option<NaiveDate>,
    /// Upper bound, inclusive: matches subscriptions with `end_date <= date_to`.
    /// Open-ended subscriptions always satisfy the upper bound.
    pub date_to: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

/// Error types for subscription operations
#[derive(Debug)]
pub enum SubscriptionError {
    /// Input rejected before reaching storage, with the offending field named
    Validation { field: &'static str, message: String },
    /// No subscription with the given id
    NotFound(i64),
    /// Storage failure, with context prefixed to the underlying cause
    Database(String),
}

impl fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "invalid {}: {}", field, message)
            }
            Self::NotFound(id) => write!(f, "subscription {} not found", id),
            Self::Database(msg) => write!(f, "database error: {}", msg),
        }
    }
}

impl std::error::Error for SubscriptionError {}

impl From<anyhow::Error> for SubscriptionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{:#}", err))
    }
}

/// Storage gateway for subscription records.
///
/// Point lookups return `Ok(None)` when the row does not exist, so callers
/// can tell "not found" apart from connection or query failures.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Fetch a subscription by id; `None` when no such row exists
    async fn get_subscription(&self, id: i64) -> anyhow::Result<Option<Subscription>>;

    /// Fetch all subscriptions; no ordering guarantee
    async fn list_subscriptions(&self) -> anyhow::Result<Vec<Subscription>>;

    /// Insert a subscription, returning the generated id
    async fn create_subscription(&self, new: NewSubscription) -> anyhow::Result<i64>;

    /// Merge the supplied fields into the stored row. Updating a missing id
    /// affects zero rows and is not an error.
    async fn update_subscription(&self, id: i64, patch: SubscriptionPatch) -> anyhow::Result<()>;

    /// Unconditional delete by id; deleting a missing id is not an error
    async fn delete_subscription(&self, id: i64) -> anyhow::Result<()>;

    /// Server-side `SUM(price)` over rows matching the filter; 0 when no
    /// rows match, never null
    async fn sum_subscriptions(&self, filter: AggregateFilter) -> anyhow::Result<i64>;
}

/// Service trait for subscription management
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Fetch a subscription by id
    async fn get_subscription(&self, id: i64) -> Result<Subscription, SubscriptionError>;

    /// Fetch all subscriptions
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, SubscriptionError>;

    /// Validate and persist a new subscription, returning the assigned id
    async fn create_subscription(&self, new: NewSubscription) -> Result<i64, SubscriptionError>;

    /// Apply a partial update; only supplied fields overwrite stored values
    async fn update_subscription(
        &self,
        id: i64,
        patch: SubscriptionPatch,
    ) -> Result<(), SubscriptionError>;

    /// Delete by id; repeated deletes are a no-op
    async fn delete_subscription(&self, id: i64) -> Result<(), SubscriptionError>;

    /// Sum prices of all subscriptions matching the filter
    async fn sum_subscriptions(&self, filter: AggregateFilter) -> Result<i64, SubscriptionError>;
}
