use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::units::{UnitCode, UnitConversionTable};
use crate::error::EmissionResult;

pub const MONTHS_PER_YEAR: usize = 12;

pub type MonthlyAmounts = SmallVec<[f64; MONTHS_PER_YEAR]>;

/// Reporting period selected on the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Yearly,
    Monthly,
    Hourly,
    Fuel,
    #[serde(other)]
    Unrecognized,
}

/// Raw amount of a record, shaped by its period.
///
/// Exactly one raw-amount shape exists per record; the variant is the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "snake_case")]
pub enum Measurement {
    Yearly {
        amount: f64,
        unit: UnitCode,
    },
    /// Partial years are summed as entered; fewer than twelve values is valid.
    Monthly {
        amounts: MonthlyAmounts,
        unit: UnitCode,
    },
    Hourly {
        rate: f64,
        hours: f64,
        unit: UnitCode,
    },
    /// Distance or fuel quantity for a fuel-coefficient category.
    Fuel {
        category: String,
        distance: f64,
    },
    /// Period value the engine does not know; aggregates to zero.
    Unrecognized,
}

impl Measurement {
    #[must_use]
    pub fn period(&self) -> Period {
        match self {
            Self::Yearly { .. } => Period::Yearly,
            Self::Monthly { .. } => Period::Monthly,
            Self::Hourly { .. } => Period::Hourly,
            Self::Fuel { .. } => Period::Fuel,
            Self::Unrecognized => Period::Unrecognized,
        }
    }

    #[must_use]
    pub fn unit(&self) -> Option<&UnitCode> {
        match self {
            Self::Yearly { unit, .. } | Self::Monthly { unit, .. } | Self::Hourly { unit, .. } => {
                Some(unit)
            }
            Self::Fuel { .. } | Self::Unrecognized => None,
        }
    }

    /// Quantity in the record's own unit before conversion.
    #[must_use]
    pub fn raw_total(&self) -> f64 {
        match self {
            Self::Yearly { amount, .. } => *amount,
            Self::Monthly { amounts, .. } => amounts.iter().sum(),
            Self::Hourly { rate, hours, .. } => rate * hours,
            Self::Fuel { distance, .. } => *distance,
            Self::Unrecognized => 0.0,
        }
    }
}

/// Reduces a measurement to metric tons per year.
///
/// Returns `Ok(None)` for fuel measurements: they are priced by the fuel
/// coefficient table directly and have no normalized tonnage.
pub fn aggregate_yearly_tons(
    measurement: &Measurement,
    units: &UnitConversionTable,
) -> EmissionResult<Option<f64>> {
    match measurement {
        Measurement::Yearly { unit, .. } | Measurement::Hourly { unit, .. } => {
            units.convert(measurement.raw_total(), unit).map(Some)
        }
        Measurement::Monthly { amounts, unit } => {
            if amounts.len() != MONTHS_PER_YEAR {
                debug!(
                    months = amounts.len(),
                    "monthly amounts do not cover a full year, summing as entered"
                );
            }
            units.convert(measurement.raw_total(), unit).map(Some)
        }
        Measurement::Fuel { .. } => Ok(None),
        Measurement::Unrecognized => Ok(Some(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    #[test]
    fn monthly_sum_is_taken_before_conversion() {
        let units = UnitConversionTable::default();
        let measurement = Measurement::Monthly {
            amounts: smallvec![250.0, 250.0, 500.0],
            unit: UnitCode::new("kg"),
        };
        let tons = aggregate_yearly_tons(&measurement, &units)
            .expect("kg is supported")
            .expect("monthly has tonnage");
        assert!((tons - 1.0).abs() <= 1e-12);
    }

    #[test]
    fn unrecognized_period_aggregates_to_zero() {
        let units = UnitConversionTable::empty();
        let tons = aggregate_yearly_tons(&Measurement::Unrecognized, &units).expect("no unit");
        assert_eq!(tons, Some(0.0));
    }

    #[test]
    fn unknown_period_string_deserializes_as_unrecognized() {
        let period: Period = serde_json::from_str("\"weekly\"").expect("period");
        assert_eq!(period, Period::Unrecognized);
    }
}
