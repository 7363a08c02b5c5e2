use utoipa::OpenApi;

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Subscriptions API",
        description = "CRUDL service for tracking user subscriptions to paid services.",
        version = "1.0.0",
        license(name = "MIT",)
    ),
    paths(
        crate::routes::health_check,
        crate::routes::subscriptions::get_subscription,
        crate::routes::subscriptions::list_subscriptions,
        crate::routes::subscriptions::get_subscriptions_aggregate,
        crate::routes::subscriptions::create_subscription,
        crate::routes::subscriptions::update_subscription,
        crate::routes::subscriptions::delete_subscription,
    ),
    components(schemas(
        crate::routes::HealthResponse,
        crate::models::SubscriptionResponse,
        crate::models::CreateSubscriptionRequest,
        crate::models::UpdateSubscriptionRequest,
        crate::models::SubscriptionIdResponse,
        crate::models::AggregateResponse,
        crate::error::ApiErrorResponse,
    )),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Subscriptions", description = "Subscription management and cost aggregation endpoints")
    )
)]
pub struct ApiDoc;
