//! Bill computation using rust_decimal for precision
//!
//! A bill is built from the subtotal of the billable lines:
//!
//! ```text
//! discount    = percent ? subtotal * percent / 100 : fixed amount
//! adjusted    = subtotal - discount
//! service_fee = include_service ? adjusted * service_fee_percent / 100 : 0
//! cover       = include_cover ? cover_charge * people : 0
//! total       = adjusted + service_fee + cover
//! ```
//!
//! Every component is rounded to 2 decimal places (midpoint away from zero).
//! The total is not clamped: a fixed discount above the subtotal produces a
//! negative total, which checkout refuses.

mod reconcile;

pub use reconcile::{ReconciliationPlan, TabCorrection, TableCorrection, reconcile};

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::TabItem;

/// Rounding precision for monetary values
pub const DECIMAL_PLACES: u32 = 2;

/// Default service fee rate (10%)
pub const SERVICE_FEE_PERCENT: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Maximum allowed unit price
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Largest fixed discount: the most a single line can be worth
pub const MAX_FIXED_DISCOUNT: Decimal = Decimal::from_parts(1_409_065_408, 2, 0, false, 0);

/// Round a monetary value to 2dp, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Discount applied to the subtotal
///
/// JSON: `{"type": "percent", "value": 10}` or `{"type": "fixed", "value": 5.5}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    Percent(Decimal),
    Fixed(Decimal),
}

impl Discount {
    /// Discount amount for a given subtotal (unrounded)
    pub fn amount(&self, subtotal: Decimal) -> Decimal {
        match self {
            Self::Percent(percent) => subtotal * *percent / Decimal::ONE_HUNDRED,
            Self::Fixed(amount) => *amount,
        }
    }
}

/// Invalid bill options
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BillingError {
    #[error("discount percent must be between 0 and 100, got {0}")]
    PercentOutOfRange(Decimal),
    #[error("fixed discount must be non-negative, got {0}")]
    NegativeFixedDiscount(Decimal),
    #[error("fixed discount must be at most {MAX_FIXED_DISCOUNT}, got {0}")]
    FixedDiscountTooLarge(Decimal),
    #[error("service fee percent must be between 0 and 100, got {0}")]
    ServiceRateOutOfRange(Decimal),
    #[error("cover charge must be non-negative, got {0}")]
    NegativeCoverCharge(Decimal),
    #[error("cover charge must be at most {MAX_PRICE}, got {0}")]
    CoverChargeTooLarge(Decimal),
    #[error("people must be at least 1, got {0}")]
    InvalidPeople(i32),
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        let code = match err {
            BillingError::PercentOutOfRange(_)
            | BillingError::NegativeFixedDiscount(_)
            | BillingError::FixedDiscountTooLarge(_) => {
                ErrorCode::InvalidDiscount
            }
            _ => ErrorCode::ValidationFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Inputs of a bill beyond the line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOptions {
    pub discount: Option<Discount>,
    pub include_service: bool,
    /// Service fee rate in percent
    pub service_fee_percent: Decimal,
    pub include_cover: bool,
    /// Couvert per person
    pub cover_charge: Decimal,
    pub people: i32,
}

impl Default for BillOptions {
    fn default() -> Self {
        Self {
            discount: None,
            include_service: false,
            service_fee_percent: SERVICE_FEE_PERCENT,
            include_cover: false,
            cover_charge: Decimal::ZERO,
            people: 1,
        }
    }
}

impl BillOptions {
    pub fn validate(&self) -> Result<(), BillingError> {
        match self.discount {
            Some(Discount::Percent(p)) if p < Decimal::ZERO || p > Decimal::ONE_HUNDRED => {
                return Err(BillingError::PercentOutOfRange(p));
            }
            Some(Discount::Fixed(a)) if a < Decimal::ZERO => {
                return Err(BillingError::NegativeFixedDiscount(a));
            }
            Some(Discount::Fixed(a)) if a > MAX_FIXED_DISCOUNT => {
                return Err(BillingError::FixedDiscountTooLarge(a));
            }
            _ => {}
        }
        if self.service_fee_percent < Decimal::ZERO
            || self.service_fee_percent > Decimal::ONE_HUNDRED
        {
            return Err(BillingError::ServiceRateOutOfRange(self.service_fee_percent));
        }
        if self.cover_charge < Decimal::ZERO {
            return Err(BillingError::NegativeCoverCharge(self.cover_charge));
        }
        if self.cover_charge > MAX_PRICE {
            return Err(BillingError::CoverChargeTooLarge(self.cover_charge));
        }
        if self.people < 1 {
            return Err(BillingError::InvalidPeople(self.people));
        }
        Ok(())
    }
}

/// Itemized bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillBreakdown {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub adjusted: Decimal,
    pub service_fee: Decimal,
    pub cover_charge: Decimal,
    pub total: Decimal,
}

/// A priced line that can be summed into a subtotal
pub trait BillLine {
    fn unit_price(&self) -> Decimal;
    fn quantity(&self) -> i32;
    fn is_billable(&self) -> bool {
        true
    }
}

impl BillLine for TabItem {
    fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }

    fn is_billable(&self) -> bool {
        self.status.is_billable()
    }
}

impl BillLine for (Decimal, i32) {
    fn unit_price(&self) -> Decimal {
        self.0
    }

    fn quantity(&self) -> i32 {
        self.1
    }
}

/// Line total: unit price x quantity, rounded
pub fn line_total(line: &impl BillLine) -> Decimal {
    round_money(line.unit_price() * Decimal::from(line.quantity()))
}

/// Sum of billable lines
pub fn subtotal<L: BillLine>(lines: &[L]) -> Decimal {
    lines
        .iter()
        .filter(|l| l.is_billable())
        .map(line_total)
        .sum()
}

/// Compose the bill for `subtotal` under `options`
///
/// Options are assumed valid; see [`BillOptions::validate`].
pub fn compute_bill(subtotal: Decimal, options: &BillOptions) -> BillBreakdown {
    let subtotal = round_money(subtotal);

    let discount = options
        .discount
        .as_ref()
        .map(|d| round_money(d.amount(subtotal)))
        .unwrap_or(Decimal::ZERO);

    let adjusted = subtotal - discount;

    let service_fee = if options.include_service {
        round_money(adjusted * options.service_fee_percent / Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    let cover_charge = if options.include_cover {
        round_money(options.cover_charge * Decimal::from(options.people))
    } else {
        Decimal::ZERO
    };

    BillBreakdown {
        subtotal,
        discount,
        adjusted,
        service_fee,
        cover_charge,
        total: adjusted + service_fee + cover_charge,
    }
}

#[cfg(test)]
mod tests;
