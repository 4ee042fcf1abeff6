//! Product (cardápio) endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{AuditAction, Product, ProductCreate, ProductUpdate};

use super::{ApiResult, db_error, verify_restaurant};
use crate::db;
use crate::services::audit::{self, AuditRecord};
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_optional_text, validate_price, validate_required_text};

/// Query params for listing products
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub available_only: bool,
}

fn product_not_found(product_id: i64) -> AppError {
    AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", product_id)
}

fn validate_stock(stock: Option<i32>) -> Result<(), AppError> {
    match stock {
        Some(s) if s < 0 => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("stock cannot be negative, got {s}"),
        )),
        _ => Ok(()),
    }
}

/// GET /api/restaurants/{restaurant_id}/products
pub async fn list_products(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Product>> {
    verify_restaurant(&state, restaurant_id).await?;
    let products = db::products::list(
        &state.pool,
        restaurant_id,
        query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()),
        query.available_only,
    )
    .await
    .map_err(db_error)?;
    Ok(Json(products))
}

/// GET /api/restaurants/{restaurant_id}/products/{product_id}
pub async fn get_product(
    State(state): State<AppState>,
    Path((restaurant_id, product_id)): Path<(i64, i64)>,
) -> ApiResult<Product> {
    let product = db::products::find(&state.pool, restaurant_id, product_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| product_not_found(product_id))?;
    Ok(Json(product))
}

/// POST /api/restaurants/{restaurant_id}/products
pub async fn create_product(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Json(data): Json<ProductCreate>,
) -> ApiResult<Product> {
    verify_restaurant(&state, restaurant_id).await?;
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&data.category, "category", MAX_NAME_LEN)?;
    validate_price(data.price)?;
    validate_stock(data.stock)?;

    let product = db::products::create(&state.pool, restaurant_id, &data)
        .await
        .map_err(db_error)?;

    tracing::info!(product_id = product.id, name = %product.name, price = %product.price, "Product created");
    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::ProductCreated, "product")
            .resource(product.id)
            .details(json!({ "name": product.name, "price": product.price })),
    )
    .await;

    Ok(Json(product))
}

/// PUT /api/restaurants/{restaurant_id}/products/{product_id}
pub async fn update_product(
    State(state): State<AppState>,
    Path((restaurant_id, product_id)): Path<(i64, i64)>,
    Json(data): Json<ProductUpdate>,
) -> ApiResult<Product> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.category, "category", MAX_NAME_LEN)?;
    if let Some(price) = data.price {
        validate_price(price)?;
    }
    validate_stock(data.stock)?;

    let product = db::products::update(&state.pool, restaurant_id, product_id, &data)
        .await
        .map_err(db_error)?
        .ok_or_else(|| product_not_found(product_id))?;

    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::ProductUpdated, "product")
            .resource(product_id)
            .details(json!(data)),
    )
    .await;

    Ok(Json(product))
}

/// DELETE /api/restaurants/{restaurant_id}/products/{product_id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path((restaurant_id, product_id)): Path<(i64, i64)>,
) -> ApiResult<bool> {
    if !db::products::delete(&state.pool, restaurant_id, product_id)
        .await
        .map_err(db_error)?
    {
        return Err(product_not_found(product_id));
    }

    audit::record(
        &state.pool,
        AuditRecord::new(restaurant_id, AuditAction::ProductDeleted, "product").resource(product_id),
    )
    .await;

    Ok(Json(true))
}
