pub mod ports;
pub mod service;
pub mod test_support;

// Re-export commonly used types
pub use ports::{
    AggregateFilter, NewSubscription, Subscription, SubscriptionError, SubscriptionPatch,
    SubscriptionRepository, SubscriptionService,
};
pub use service::SubscriptionServiceImpl;
