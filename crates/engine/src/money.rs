//! Exact decimal amounts.
//!
//! Amounts are [`Decimal`] values with at most two fractional digits. They
//! are persisted as text (`"100.00"`) because SQLite has no exact numeric
//! type and sea-orm would otherwise round-trip them through `f64`.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{EngineError, ResultEngine};

/// Number of fractional digits kept for every amount.
pub const SCALE: u32 = 2;

/// Validate an amount and return it with exactly [`SCALE`] fractional digits.
///
/// Rejects values that would lose precision when rescaled.
pub(crate) fn normalize_amount(value: Decimal, label: &str) -> ResultEngine<Decimal> {
    if value.normalize().scale() > SCALE {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must have at most {SCALE} decimal places"
        )));
    }
    let mut value = value;
    value.rescale(SCALE);
    Ok(value)
}

/// Same as [`normalize_amount`] but also requires `value > 0`.
pub(crate) fn normalize_positive_amount(value: Decimal, label: &str) -> ResultEngine<Decimal> {
    if value <= Decimal::ZERO {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    normalize_amount(value, label)
}

pub(crate) fn to_storage(value: Decimal) -> String {
    value.to_string()
}

pub(crate) fn from_storage(value: &str) -> ResultEngine<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| EngineError::InvalidAmount(format!("invalid stored amount: {value}")))
}
