//! Sales (vendas) and report endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Sale, SalesReport};
use shared::util::day_start_millis;

use super::{ApiResult, db_error, verify_restaurant};
use crate::db;
use crate::state::AppState;
use crate::validation::page_bounds;

const DAY_MS: i64 = 86_400_000;

/// Query params for sales and reports
///
/// `date` (`YYYY-MM-DD` or `today`, UTC) overrides `from`/`to`.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub date: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl SalesQuery {
    /// Resolve to a half-open `[from, to)` range in millis
    fn range(&self) -> Result<(Option<i64>, Option<i64>), AppError> {
        let Some(date) = self.date.as_deref().map(str::trim) else {
            if let (Some(from), Some(to)) = (self.from, self.to)
                && from > to
            {
                return Err(AppError::validation(format!("from ({from}) is after to ({to})")));
            }
            return Ok((self.from, self.to));
        };

        let start = if date.eq_ignore_ascii_case("today") {
            day_start_millis(db::now_millis())
        } else {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp_millis())
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::ValidationFailed,
                        format!("Invalid date '{date}', expected YYYY-MM-DD"),
                    )
                })?
        };
        Ok((Some(start), Some(start + DAY_MS)))
    }
}

/// GET /api/restaurants/{restaurant_id}/sales
pub async fn list_sales(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<SalesQuery>,
) -> ApiResult<Vec<Sale>> {
    verify_restaurant(&state, restaurant_id).await?;
    let (from, to) = query.range()?;
    let (limit, offset) = page_bounds(query.page, query.per_page);
    let sales = db::sales::list(&state.pool, restaurant_id, from, to, limit, offset)
        .await
        .map_err(db_error)?;
    Ok(Json(sales))
}

/// GET /api/restaurants/{restaurant_id}/sales/{sale_id}
pub async fn get_sale(
    State(state): State<AppState>,
    Path((restaurant_id, sale_id)): Path<(i64, i64)>,
) -> ApiResult<Sale> {
    let sale = db::sales::find(&state.pool, restaurant_id, sale_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::SaleNotFound).with_detail("sale_id", sale_id))?;
    Ok(Json(sale))
}

/// GET /api/restaurants/{restaurant_id}/sales/report
pub async fn sales_report(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
    Query(query): Query<SalesQuery>,
) -> ApiResult<SalesReport> {
    verify_restaurant(&state, restaurant_id).await?;
    let (from, to) = query.range()?;

    let totals = db::sales::totals(&state.pool, restaurant_id, from, to)
        .await
        .map_err(db_error)?;
    let by_payment_method = db::sales::totals_by_method(&state.pool, restaurant_id, from, to)
        .await
        .map_err(db_error)?;

    Ok(Json(SalesReport {
        from,
        to,
        count: totals.count,
        subtotal: totals.subtotal,
        discount: totals.discount,
        service_fee: totals.service_fee,
        cover_charge: totals.cover_charge,
        total: totals.total,
        by_payment_method,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_resolves_to_one_utc_day() {
        let query = SalesQuery {
            date: Some("2025-03-01".into()),
            ..Default::default()
        };
        let (from, to) = query.range().unwrap();
        assert_eq!(from, Some(1_740_787_200_000));
        assert_eq!(to, Some(1_740_787_200_000 + DAY_MS));
    }

    #[test]
    fn today_starts_at_midnight() {
        let query = SalesQuery {
            date: Some("today".into()),
            ..Default::default()
        };
        let (from, to) = query.range().unwrap();
        let from = from.unwrap();
        assert_eq!(from % DAY_MS, 0);
        assert_eq!(to, Some(from + DAY_MS));
    }

    #[test]
    fn bad_date_is_rejected() {
        let query = SalesQuery {
            date: Some("01/03/2025".into()),
            ..Default::default()
        };
        assert_eq!(query.range().unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let query = SalesQuery {
            from: Some(10),
            to: Some(5),
            ..Default::default()
        };
        assert!(query.range().is_err());
        let open_ended = SalesQuery {
            from: Some(10),
            ..Default::default()
        };
        assert_eq!(open_ended.range().unwrap(), (Some(10), None));
    }
}
