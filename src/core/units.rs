use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{EmissionError, EmissionResult};

/// Physical unit code as entered by the user (`kg`, `t`, `kWh`, `L`, ...).
///
/// Codes are matched exactly against the conversion table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCode(String);

impl UnitCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UnitCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitFamily {
    Mass,
    Volume,
    Energy,
}

/// Tons-multiplier for one unit.
///
/// Mass units carry a plain metric factor. Volume and energy units carry an
/// emission factor already folded into tons of gas per unit (for fuels that is
/// density times carbon content, for electricity the grid factor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    pub family: UnitFamily,
    pub tons_per_unit: f64,
}

impl UnitConversion {
    #[must_use]
    pub fn new(family: UnitFamily, tons_per_unit: f64) -> Self {
        Self {
            family,
            tons_per_unit,
        }
    }

    #[must_use]
    pub fn mass(tons_per_unit: f64) -> Self {
        Self::new(UnitFamily::Mass, tons_per_unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitConversionTable {
    entries: IndexMap<UnitCode, UnitConversion>,
}

impl UnitConversionTable {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<UnitCode>, conversion: UnitConversion) -> Self {
        self.entries.insert(unit.into(), conversion);
        self
    }

    #[must_use]
    pub fn get(&self, unit: &UnitCode) -> Option<UnitConversion> {
        self.entries.get(unit).copied()
    }

    #[must_use]
    pub fn contains(&self, unit: &UnitCode) -> bool {
        self.entries.contains_key(unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitCode, &UnitConversion)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts `value` expressed in `unit` into metric tons.
    ///
    /// An unknown unit is an error rather than a silent default: a wrong factor
    /// would corrupt every total built on top of the result.
    pub fn convert(&self, value: f64, unit: &UnitCode) -> EmissionResult<f64> {
        let conversion = self
            .get(unit)
            .ok_or_else(|| EmissionError::UnsupportedUnit {
                unit: unit.as_str().to_owned(),
            })?;
        let tons = value * conversion.tons_per_unit;
        trace!(unit = %unit, value, tons, "convert to tons");
        Ok(tons)
    }

    pub(crate) fn validate(&self) -> EmissionResult<()> {
        for (unit, conversion) in &self.entries {
            if unit.as_str().trim().is_empty() {
                return Err(EmissionError::InvalidTable(
                    "unit code must not be empty".to_owned(),
                ));
            }
            if !conversion.tons_per_unit.is_finite() || conversion.tons_per_unit < 0.0 {
                return Err(EmissionError::InvalidTable(format!(
                    "unit `{unit}` multiplier must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

impl Default for UnitConversionTable {
    /// Metric mass units plus common fuel and electricity factors.
    fn default() -> Self {
        Self::empty()
            .with_unit("g", UnitConversion::mass(0.000_001))
            .with_unit("kg", UnitConversion::mass(0.001))
            .with_unit("t", UnitConversion::mass(1.0))
            .with_unit("ton", UnitConversion::mass(1.0))
            .with_unit("lb", UnitConversion::mass(0.000_453_592_37))
            // Gasoline: 0.7375 kg/L density at 2.263 kg CO2 per liter burnt.
            .with_unit("L", UnitConversion::new(UnitFamily::Volume, 0.002_263))
            .with_unit("m3", UnitConversion::new(UnitFamily::Volume, 2.263))
            .with_unit("kWh", UnitConversion::new(UnitFamily::Energy, 0.000_495))
            .with_unit("MWh", UnitConversion::new(UnitFamily::Energy, 0.495))
    }
}

impl FromIterator<(UnitCode, UnitConversion)> for UnitConversionTable {
    fn from_iter<T: IntoIterator<Item = (UnitCode, UnitConversion)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilograms_convert_to_tons() {
        let table = UnitConversionTable::default();
        let tons = table.convert(100.0, &UnitCode::new("kg")).expect("kg");
        assert!((tons - 0.1).abs() <= 1e-12);
    }

    #[test]
    fn unit_lookup_is_case_sensitive() {
        let table = UnitConversionTable::default();
        let err = table
            .convert(1.0, &UnitCode::new("KG"))
            .expect_err("upper-case code is not registered");
        assert_eq!(
            err,
            EmissionError::UnsupportedUnit {
                unit: "KG".to_owned()
            }
        );
    }

    #[test]
    fn validate_rejects_negative_multiplier() {
        let table = UnitConversionTable::empty().with_unit("kg", UnitConversion::mass(-1.0));
        assert!(table.validate().is_err());
    }
}
