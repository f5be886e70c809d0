use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EmissionError, EmissionResult};

/// Decimal places shown for tons and CO2e in inventory tables.
pub const DISPLAY_DECIMALS: u32 = 3;

/// Rounds half away from zero to `decimals` places for display.
pub fn round_for_display(value: f64, decimals: u32) -> EmissionResult<Decimal> {
    if !value.is_finite() {
        return Err(EmissionError::InvalidData(format!(
            "display value must be finite, got {value}"
        )));
    }
    let decimal = Decimal::from_f64(value).ok_or_else(|| {
        EmissionError::InvalidData(format!("display value {value} has no decimal form"))
    })?;
    Ok(decimal.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero))
}
