use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::coefficient::{Coefficient, CoefficientAdvisory};
use crate::error::{EmissionError, EmissionResult};

/// Identifier of a greenhouse gas (or fuel-category gas code) in the GWP table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GasCode(String);

impl GasCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased code used as the unit key of fuel coefficient entries.
    #[must_use]
    pub fn to_fuel_unit(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for GasCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GasCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GasCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GwpEntry {
    pub label: String,
    pub ar5: f64,
}

impl GwpEntry {
    #[must_use]
    pub fn new(label: impl Into<String>, ar5: f64) -> Self {
        Self {
            label: label.into(),
            ar5,
        }
    }
}

/// AR5 global-warming-potential coefficients keyed by gas code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GwpTable {
    entries: IndexMap<GasCode, GwpEntry>,
}

impl GwpTable {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_gas(mut self, gas: impl Into<GasCode>, entry: GwpEntry) -> Self {
        self.entries.insert(gas.into(), entry);
        self
    }

    /// Exact-match lookup; `None` when the gas is not configured.
    #[must_use]
    pub fn lookup(&self, gas: &GasCode) -> Option<f64> {
        self.entries.get(gas).map(|entry| entry.ar5)
    }

    /// Resolves the coefficient for `gas`, falling back to `0` with an advisory.
    #[must_use]
    pub fn resolve(&self, gas: &GasCode) -> Coefficient {
        match self.lookup(gas) {
            Some(ar5) => Coefficient::gwp(ar5),
            None => {
                warn!(gas = %gas, "gas missing from GWP table, coefficient falls back to 0");
                Coefficient::unresolved(CoefficientAdvisory::UnknownGas { gas: gas.clone() })
            }
        }
    }

    #[must_use]
    pub fn label(&self, gas: &GasCode) -> Option<&str> {
        self.entries.get(gas).map(|entry| entry.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GasCode, &GwpEntry)> {
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

    pub(crate) fn validate(&self) -> EmissionResult<()> {
        for (gas, entry) in &self.entries {
            if gas.as_str().trim().is_empty() {
                return Err(EmissionError::InvalidTable(
                    "gas code must not be empty".to_owned(),
                ));
            }
            if !entry.ar5.is_finite() || entry.ar5 < 0.0 {
                return Err(EmissionError::InvalidTable(format!(
                    "gas `{gas}` AR5 coefficient must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

impl Default for GwpTable {
    /// IPCC AR5 100-year values for the Kyoto basket.
    fn default() -> Self {
        Self::empty()
            .with_gas("CO2", GwpEntry::new("CO2", 1.0))
            .with_gas("CH4", GwpEntry::new("CH4", 28.0))
            .with_gas("N2O", GwpEntry::new("N2O", 265.0))
            .with_gas("HFC-23", GwpEntry::new("HFC-23", 12_400.0))
            .with_gas("HFC-32", GwpEntry::new("HFC-32", 677.0))
            .with_gas("HFC-134a", GwpEntry::new("HFC-134a", 1_300.0))
            .with_gas("HFC-143a", GwpEntry::new("HFC-143a", 4_800.0))
            .with_gas("CF4", GwpEntry::new("PFC-14 (CF4)", 6_630.0))
            .with_gas("C2F6", GwpEntry::new("PFC-116 (C2F6)", 11_100.0))
            .with_gas("SF6", GwpEntry::new("SF6", 23_500.0))
            .with_gas("NF3", GwpEntry::new("NF3", 16_100.0))
    }
}

impl FromIterator<(GasCode, GwpEntry)> for GwpTable {
    fn from_iter<T: IntoIterator<Item = (GasCode, GwpEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
