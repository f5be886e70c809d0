use serde::{Deserialize, Serialize};

use crate::core::gwp::GasCode;

/// Advisory raised when a coefficient lookup finds no match.
///
/// The resolved coefficient is `0` in every case; the advisory lets callers
/// surface a warning while an entry form is still incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoefficientAdvisory {
    UnknownGas { gas: GasCode },
    UnknownFuelCategory { category: String },
    UnknownFuelUnit { category: String, unit: String },
}

impl CoefficientAdvisory {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UnknownGas { gas } => {
                format!("no GWP coefficient for gas `{gas}`; counted as 0")
            }
            Self::UnknownFuelCategory { category } => {
                format!("no fuel coefficients for category `{category}`; counted as 0")
            }
            Self::UnknownFuelUnit { category, unit } => {
                format!("fuel category `{category}` has no coefficient for `{unit}`; counted as 0")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoefficientSource {
    Gwp,
    Fuel,
    Unresolved { advisory: CoefficientAdvisory },
}

/// Coefficient chosen for a record together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub value: f64,
    pub source: CoefficientSource,
}

impl Coefficient {
    #[must_use]
    pub fn gwp(value: f64) -> Self {
        Self {
            value,
            source: CoefficientSource::Gwp,
        }
    }

    #[must_use]
    pub fn fuel(value: f64) -> Self {
        Self {
            value,
            source: CoefficientSource::Fuel,
        }
    }

    #[must_use]
    pub fn unresolved(advisory: CoefficientAdvisory) -> Self {
        Self {
            value: 0.0,
            source: CoefficientSource::Unresolved { advisory },
        }
    }

    #[must_use]
    pub fn advisory(&self) -> Option<&CoefficientAdvisory> {
        match &self.source {
            CoefficientSource::Unresolved { advisory } => Some(advisory),
            CoefficientSource::Gwp | CoefficientSource::Fuel => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.advisory().is_none()
    }
}
