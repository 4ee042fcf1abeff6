//! Restaurant endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{AuditAction, Restaurant, RestaurantCreate, RestaurantUpdate};

use super::{ApiResult, db_error, verify_restaurant};
use crate::db;
use crate::services::audit::{self, AuditRecord};
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_non_negative, validate_percent, validate_required_text};

/// GET /api/restaurants
pub async fn list_restaurants(State(state): State<AppState>) -> ApiResult<Vec<Restaurant>> {
    let restaurants = db::restaurants::list(&state.pool).await.map_err(db_error)?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/{restaurant_id}
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> ApiResult<Restaurant> {
    Ok(Json(verify_restaurant(&state, restaurant_id).await?))
}

/// POST /api/restaurants
pub async fn create_restaurant(
    State(state): State<AppState>,
    Json(data): Json<RestaurantCreate>,
) -> ApiResult<Restaurant> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    if let Some(rate) = data.service_fee_percent {
        validate_percent(rate, "service_fee_percent")?;
    }
    if let Some(cover) = data.cover_charge {
        validate_non_negative(cover, "cover_charge")?;
    }

    let restaurant = db::restaurants::create(&state.pool, &data)
        .await
        .map_err(db_error)?;

    tracing::info!(restaurant_id = restaurant.id, name = %restaurant.name, "Restaurant created");
    audit::record(
        &state.pool,
        AuditRecord::new(restaurant.id, AuditAction::RestaurantCreated, "restaurant")
            .resource(restaurant.id)
            .details(json!({ "name": restaurant.name })),
    )
    .await;

    Ok(Json(restaurant))
}

/// PUT /api/restaurants/{restaurant_id}
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<RestaurantUpdate>,
) -> ApiResult<Restaurant> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(rate) = data.service_fee_percent {
        validate_percent(rate, "service_fee_percent")?;
    }
    if let Some(cover) = data.cover_charge {
        validate_non_negative(cover, "cover_charge")?;
    }

    let restaurant = db::restaurants::update(&state.pool, restaurant_id, &data)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::RestaurantUpdated, "restaurant")
            .resource(restaurant_id)
            .details(json!(data)),
    )
    .await;

    Ok(Json(restaurant))
}
