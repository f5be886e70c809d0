use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::core::coefficient::Coefficient;
use crate::core::gwp::GasCode;
use crate::core::period::{Measurement, MonthlyAmounts, Period};
use crate::core::units::UnitCode;

/// Unit assumed for stored tonnage when the entered quantity was not persisted.
pub const STORED_TONNAGE_UNIT: &str = "t";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One emitting activity with its derived yearly CO2e.
///
/// Derived fields are only ever produced by `RecordFactory`; there are no
/// setters, an edit builds a replacement record with the same id.
///
/// Serializes as a [`StoredRecord`]. There is no `Deserialize`: a loaded
/// record is always re-derived from its stored raw fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    source_name: String,
    gas: GasCode,
    measurement: Measurement,
    normalized_yearly_tons: Option<f64>,
    coefficient: Coefficient,
    co2e_per_year: f64,
}

impl Record {
    pub(crate) fn from_parts(
        id: RecordId,
        source_name: String,
        gas: GasCode,
        measurement: Measurement,
        normalized_yearly_tons: Option<f64>,
        coefficient: Coefficient,
        co2e_per_year: f64,
    ) -> Self {
        Self {
            id,
            source_name,
            gas,
            measurement,
            normalized_yearly_tons,
            coefficient,
            co2e_per_year,
        }
    }

    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub fn gas(&self) -> &GasCode {
        &self.gas
    }

    #[must_use]
    pub fn period(&self) -> Period {
        self.measurement.period()
    }

    #[must_use]
    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// Metric tons per year; `None` for fuel records.
    #[must_use]
    pub fn normalized_yearly_tons(&self) -> Option<f64> {
        self.normalized_yearly_tons
    }

    #[must_use]
    pub fn coefficient(&self) -> &Coefficient {
        &self.coefficient
    }

    #[must_use]
    pub fn co2e_per_year(&self) -> f64 {
        self.co2e_per_year
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StoredRecord::from(self).serialize(serializer)
    }
}

/// Persisted record row, shared with the entry form's document format.
///
/// `yearlyAmount`, `ar5`, `co2e` and `carbonTonsPerYear` are written for
/// readers of the document and ignored on load. Older documents hold no
/// `enteredAmount` and no `hours`; their yearly and hourly rows fall back to
/// the stored `yearlyAmount` tonnage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    #[serde(alias = "id")]
    pub key: RecordId,
    #[serde(default)]
    pub source_name: String,
    #[serde(default, alias = "gas")]
    pub gwp: GasCode,
    #[serde(default = "stored_default_period")]
    pub period: Period,
    #[serde(default)]
    pub unit: UnitCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entered_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_amount: Option<f64>,
    #[serde(default)]
    pub monthly_amount: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub km: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub km_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ar5: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2e: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_tons_per_year: Option<f64>,
}

impl StoredRecord {
    /// Raw measurement this row describes; derived columns are not consulted
    /// except as the tonnage fallback for rows without an entered quantity.
    #[must_use]
    pub fn measurement(&self) -> Measurement {
        let stored_tons = || Measurement::Yearly {
            amount: self.yearly_amount.unwrap_or(0.0),
            unit: UnitCode::new(STORED_TONNAGE_UNIT),
        };
        match self.period {
            Period::Yearly => match self.entered_amount {
                Some(amount) => Measurement::Yearly {
                    amount,
                    unit: self.unit.clone(),
                },
                None => stored_tons(),
            },
            Period::Monthly => Measurement::Monthly {
                amounts: self
                    .monthly_amount
                    .iter()
                    .map(|amount| amount.unwrap_or(0.0))
                    .collect::<MonthlyAmounts>(),
                unit: self.unit.clone(),
            },
            Period::Hourly => match self.hours {
                Some(hours) => Measurement::Hourly {
                    rate: self.hourly_amount.unwrap_or(0.0),
                    hours,
                    unit: self.unit.clone(),
                },
                None => Measurement::Hourly {
                    rate: self.yearly_amount.unwrap_or(0.0),
                    hours: 1.0,
                    unit: UnitCode::new(STORED_TONNAGE_UNIT),
                },
            },
            Period::Fuel => Measurement::Fuel {
                category: self.km.clone().unwrap_or_default(),
                distance: self.km_amount.unwrap_or(0.0),
            },
            Period::Unrecognized => Measurement::Unrecognized,
        }
    }
}

impl From<&Record> for StoredRecord {
    fn from(record: &Record) -> Self {
        let mut stored = Self {
            key: record.id.clone(),
            source_name: record.source_name.clone(),
            gwp: record.gas.clone(),
            period: record.period(),
            unit: UnitCode::default(),
            entered_amount: None,
            yearly_amount: record.normalized_yearly_tons,
            monthly_amount: Vec::new(),
            hourly_amount: None,
            hours: None,
            km: None,
            km_amount: None,
            ar5: Some(record.coefficient.value),
            co2e: Some(record.co2e_per_year),
            carbon_tons_per_year: Some(record.co2e_per_year),
        };
        match &record.measurement {
            Measurement::Yearly { amount, unit } => {
                stored.entered_amount = Some(*amount);
                stored.unit = unit.clone();
            }
            Measurement::Monthly { amounts, unit } => {
                stored.monthly_amount = amounts.iter().copied().map(Some).collect();
                stored.unit = unit.clone();
            }
            Measurement::Hourly { rate, hours, unit } => {
                stored.hourly_amount = Some(*rate);
                stored.hours = Some(*hours);
                stored.unit = unit.clone();
            }
            Measurement::Fuel { category, distance } => {
                stored.km = Some(category.clone());
                stored.km_amount = Some(*distance);
            }
            Measurement::Unrecognized => {}
        }
        stored
    }
}

fn stored_default_period() -> Period {
    Period::Yearly
}
