use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::coefficient::{Coefficient, CoefficientAdvisory};

/// One `{unit code, coefficient}` pair of a fuel category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelCoefficient {
    #[serde(rename = "unit1")]
    pub unit: String,
    #[serde(rename = "data")]
    pub coefficient: f64,
}

impl FuelCoefficient {
    #[must_use]
    pub fn new(unit: impl Into<String>, coefficient: f64) -> Self {
        Self {
            unit: unit.into(),
            coefficient,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelCategory {
    #[serde(rename = "nameZh")]
    pub name: String,
    #[serde(rename = "data", default)]
    pub coefficients: Vec<FuelCoefficient>,
}

impl FuelCategory {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coefficients: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_coefficient(mut self, unit: impl Into<String>, coefficient: f64) -> Self {
        self.coefficients
            .push(FuelCoefficient::new(unit, coefficient));
        self
    }

    /// Finds the coefficient whose unit matches `unit` ignoring case.
    ///
    /// Source data mixes `co2`/`CO2` spellings, so both sides are upper-cased
    /// before comparing. The first matching entry wins.
    #[must_use]
    pub fn coefficient_for(&self, unit: &str) -> Option<f64> {
        let target = unit.to_uppercase();
        self.coefficients
            .iter()
            .find(|entry| entry.unit.to_uppercase() == target)
            .map(|entry| entry.coefficient)
    }
}

/// Emission factors per fuel or distance category, as supplied with the
/// scope document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelCoefficientTable {
    categories: Vec<FuelCategory>,
}

impl FuelCoefficientTable {
    #[must_use]
    pub fn new(categories: Vec<FuelCategory>) -> Self {
        Self { categories }
    }

    #[must_use]
    pub fn with_category(mut self, category: FuelCategory) -> Self {
        self.categories.push(category);
        self
    }

    /// Category names are matched exactly.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&FuelCategory> {
        self.categories.iter().find(|category| category.name == name)
    }

    #[must_use]
    pub fn lookup(&self, category: &str, unit: &str) -> Option<f64> {
        self.category(category)?.coefficient_for(unit)
    }

    /// Resolves the coefficient for `(category, unit)`; a miss at either level
    /// falls back to `0` with an advisory naming the level that missed.
    #[must_use]
    pub fn resolve(&self, category: &str, unit: &str) -> Coefficient {
        let Some(entry) = self.category(category) else {
            warn!(category, "fuel category not found, coefficient falls back to 0");
            return Coefficient::unresolved(CoefficientAdvisory::UnknownFuelCategory {
                category: category.to_owned(),
            });
        };

        match entry.coefficient_for(unit) {
            Some(value) => Coefficient::fuel(value),
            None => {
                warn!(
                    category,
                    unit, "fuel unit not found in category, coefficient falls back to 0"
                );
                Coefficient::unresolved(CoefficientAdvisory::UnknownFuelUnit {
                    category: category.to_owned(),
                    unit: unit.to_uppercase(),
                })
            }
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[FuelCategory] {
        &self.categories
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
