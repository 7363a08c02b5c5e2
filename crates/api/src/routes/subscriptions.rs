use crate::{
    error::ApiError,
    models::{
        parse_month, parse_user_id, AggregateResponse, CreateSubscriptionRequest,
        SubscriptionIdResponse, SubscriptionResponse, UpdateSubscriptionRequest,
    },
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use services::subscription::{AggregateFilter, SubscriptionError};

/// Query parameters for the cost-aggregation endpoint
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AggregateParams {
    /// Lower date bound in MM-YYYY format (inclusive)
    pub from: Option<String>,
    /// Upper date bound in MM-YYYY format (inclusive)
    pub to: Option<String>,
    /// Filter by subscribing user (UUID); absent = any user
    pub user: Option<String>,
    /// Filter by service name; absent = any service
    pub service: Option<String>,
}

fn map_subscription_error(err: SubscriptionError, action: &str) -> ApiError {
    match err {
        SubscriptionError::Validation { .. } => ApiError::bad_request(err.to_string()),
        SubscriptionError::NotFound(id) => {
            ApiError::not_found(format!("Subscription {} not found", id))
        }
        SubscriptionError::Database(msg) => {
            tracing::error!(error = ?msg, "Database error while trying to {}", action);
            ApiError::internal_server_error(format!("Failed to {}", action))
        }
    }
}

/// Get a subscription by id
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/{id}",
    tag = "Subscriptions",
    params(
        ("id" = i64, Path, description = "Subscription id")
    ),
    responses(
        (status = 200, description = "Subscription retrieved successfully", body = SubscriptionResponse),
        (status = 404, description = "Subscription not found", body = crate::error::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn get_subscription(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    tracing::debug!("Fetching subscription id={}", id);

    let subscription = app_state
        .subscription_service
        .get_subscription(id)
        .await
        .map_err(|e| map_subscription_error(e, "get subscription"))?;

    Ok(Json(subscription.into()))
}

/// List all subscriptions
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Subscriptions retrieved successfully", body = [SubscriptionResponse]),
        (status = 500, description = "Internal server error", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn list_subscriptions(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<SubscriptionResponse>>, ApiError> {
    tracing::debug!("Listing subscriptions");

    let subscriptions = app_state
        .subscription_service
        .list_subscriptions()
        .await
        .map_err(|e| map_subscription_error(e, "list subscriptions"))?;

    Ok(Json(
        subscriptions.into_iter().map(Into::into).collect(),
    ))
}

/// Sum subscription prices over a date range, optionally narrowed by user
/// and service. At least one of `from`/`to` must be supplied.
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/aggregate",
    tag = "Subscriptions",
    params(
        AggregateParams
    ),
    responses(
        (status = 200, description = "Aggregate computed successfully", body = AggregateResponse),
        (status = 400, description = "Missing date bounds or malformed filter values", body = crate::error::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn get_subscriptions_aggregate(
    State(app_state): State<AppState>,
    Query(params): Query<AggregateParams>,
) -> Result<Json<AggregateResponse>, ApiError> {
    // Empty strings count as absent, matching the wire convention
    let from = params.from.filter(|s| !s.is_empty());
    let to = params.to.filter(|s| !s.is_empty());
    let user = params.user.filter(|s| !s.is_empty());
    let service = params.service.filter(|s| !s.is_empty());

    if from.is_none() && to.is_none() {
        return Err(ApiError::bad_request(
            "At least one of 'from' or 'to' must be provided",
        ));
    }

    let filter = AggregateFilter {
        date_from: from.map(|raw| parse_month("from", &raw)).transpose()?,
        date_to: to.map(|raw| parse_month("to", &raw)).transpose()?,
        user_id: user.map(|raw| parse_user_id("user", &raw)).transpose()?,
        service_name: service,
    };

    let sum = app_state
        .subscription_service
        .sum_subscriptions(filter)
        .await
        .map_err(|e| map_subscription_error(e, "aggregate subscriptions"))?;

    Ok(Json(AggregateResponse { sum }))
}

/// Create a new subscription
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    tag = "Subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription created successfully", body = SubscriptionIdResponse),
        (status = 400, description = "Validation error", body = crate::error::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn create_subscription(
    State(app_state): State<AppState>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> Result<Json<SubscriptionIdResponse>, ApiError> {
    tracing::info!(
        "Creating subscription for user_id={}, service_name={}",
        req.user_id,
        req.service_name
    );

    let new = req.into_domain()?;

    let id = app_state
        .subscription_service
        .create_subscription(new)
        .await
        .map_err(|e| map_subscription_error(e, "create subscription"))?;

    Ok(Json(SubscriptionIdResponse { id }))
}

/// Partially update a subscription; only supplied fields are overwritten
#[utoipa::path(
    patch,
    path = "/api/v1/subscriptions/{id}",
    tag = "Subscriptions",
    params(
        ("id" = i64, Path, description = "Subscription id")
    ),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription updated successfully", body = SubscriptionIdResponse),
        (status = 400, description = "Validation error", body = crate::error::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn update_subscription(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSubscriptionRequest>,
) -> Result<Json<SubscriptionIdResponse>, ApiError> {
    tracing::info!("Updating subscription id={}", id);

    let patch = req.into_patch()?;

    app_state
        .subscription_service
        .update_subscription(id, patch)
        .await
        .map_err(|e| map_subscription_error(e, "update subscription"))?;

    Ok(Json(SubscriptionIdResponse { id }))
}

/// Delete a subscription by id; deleting an unknown id is a no-op
#[utoipa::path(
    delete,
    path = "/api/v1/subscriptions/{id}",
    tag = "Subscriptions",
    params(
        ("id" = i64, Path, description = "Subscription id")
    ),
    responses(
        (status = 200, description = "Subscription deleted successfully", body = SubscriptionIdResponse),
        (status = 500, description = "Internal server error", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn delete_subscription(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SubscriptionIdResponse>, ApiError> {
    tracing::info!("Deleting subscription id={}", id);

    app_state
        .subscription_service
        .delete_subscription(id)
        .await
        .map_err(|e| map_subscription_error(e, "delete subscription"))?;

    Ok(Json(SubscriptionIdResponse { id }))
}

/// Create the subscriptions router
pub fn create_subscriptions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route(
            "/api/v1/subscriptions/aggregate",
            get(get_subscriptions_aggregate),
        )
        .route(
            "/api/v1/subscriptions/{id}",
            get(get_subscription)
                .patch(update_subscription)
                .delete(delete_subscription),
        )
}
