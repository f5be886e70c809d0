use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    Coefficient, FuelCoefficientTable, GasCode, Measurement, MonthlyAmounts, Period, Record,
    RecordId, StoredRecord, UnitCode, aggregate_yearly_tons,
};
use crate::error::EmissionResult;

use super::{EmissionTables, IdSource};

/// Activity entry as collected by the input form.
///
/// Field names follow the persisted form payload. The form layer guarantees
/// shape; absent numbers here read as zero and are not validated again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    #[serde(default)]
    pub source_name: String,
    #[serde(default, rename = "gwp", alias = "gas")]
    pub gas: GasCode,
    #[serde(default = "default_period")]
    pub period: Period,
    #[serde(default)]
    pub yearly_amount: Option<f64>,
    #[serde(default, rename = "monthlyAmount")]
    pub monthly_amounts: Vec<Option<f64>>,
    #[serde(default, rename = "hourlyAmount")]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub unit: UnitCode,
    #[serde(default, rename = "km")]
    pub fuel_category: Option<String>,
    #[serde(default, rename = "kmAmount")]
    pub distance_amount: Option<f64>,
}

impl RecordInput {
    fn base(source_name: impl Into<String>, gas: impl Into<GasCode>, period: Period) -> Self {
        Self {
            source_name: source_name.into(),
            gas: gas.into(),
            period,
            yearly_amount: None,
            monthly_amounts: Vec::new(),
            hourly_rate: None,
            hours: None,
            unit: UnitCode::default(),
            fuel_category: None,
            distance_amount: None,
        }
    }

    #[must_use]
    pub fn yearly(
        source_name: impl Into<String>,
        gas: impl Into<GasCode>,
        amount: f64,
        unit: impl Into<UnitCode>,
    ) -> Self {
        Self {
            yearly_amount: Some(amount),
            unit: unit.into(),
            ..Self::base(source_name, gas, Period::Yearly)
        }
    }

    #[must_use]
    pub fn monthly<I>(
        source_name: impl Into<String>,
        gas: impl Into<GasCode>,
        amounts: I,
        unit: impl Into<UnitCode>,
    ) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            monthly_amounts: amounts.into_iter().map(Some).collect(),
            unit: unit.into(),
            ..Self::base(source_name, gas, Period::Monthly)
        }
    }

    #[must_use]
    pub fn hourly(
        source_name: impl Into<String>,
        gas: impl Into<GasCode>,
        rate: f64,
        hours: f64,
        unit: impl Into<UnitCode>,
    ) -> Self {
        Self {
            hourly_rate: Some(rate),
            hours: Some(hours),
            unit: unit.into(),
            ..Self::base(source_name, gas, Period::Hourly)
        }
    }

    /// Fuel rows look up the upper-cased gas code as the coefficient unit,
    /// whether or not the gas is in the GWP table.
    #[must_use]
    pub fn fuel(
        source_name: impl Into<String>,
        gas: impl Into<GasCode>,
        category: impl Into<String>,
        distance: f64,
    ) -> Self {
        Self {
            fuel_category: Some(category.into()),
            distance_amount: Some(distance),
            ..Self::base(source_name, gas, Period::Fuel)
        }
    }

    /// Keeps only the raw fields the selected period reads.
    #[must_use]
    pub fn to_measurement(&self) -> Measurement {
        match self.period {
            Period::Yearly => Measurement::Yearly {
                amount: self.yearly_amount.unwrap_or(0.0),
                unit: self.unit.clone(),
            },
            Period::Monthly => Measurement::Monthly {
                amounts: self
                    .monthly_amounts
                    .iter()
                    .map(|amount| amount.unwrap_or(0.0))
                    .collect::<MonthlyAmounts>(),
                unit: self.unit.clone(),
            },
            Period::Hourly => Measurement::Hourly {
                rate: self.hourly_rate.unwrap_or(0.0),
                hours: self.hours.unwrap_or(0.0),
                unit: self.unit.clone(),
            },
            Period::Fuel => Measurement::Fuel {
                category: self.fuel_category.clone().unwrap_or_default(),
                distance: self.distance_amount.unwrap_or(0.0),
            },
            Period::Unrecognized => Measurement::Unrecognized,
        }
    }
}

fn default_period() -> Period {
    Period::Yearly
}

/// Builds finalized records from form input and the current lookup tables.
///
/// Apart from identifier generation every step is a pure function of the
/// input and the tables.
pub struct RecordFactory<'a, I: IdSource> {
    tables: &'a EmissionTables,
    fuel: &'a FuelCoefficientTable,
    ids: I,
}

impl<'a, I: IdSource> RecordFactory<'a, I> {
    #[must_use]
    pub fn new(tables: &'a EmissionTables, fuel: &'a FuelCoefficientTable, ids: I) -> Self {
        Self { tables, fuel, ids }
    }

    /// Creates a record with a fresh identifier.
    ///
    /// Fails only with `UnsupportedUnit`; an unmatched coefficient resolves
    /// to zero and is reported through `Record::coefficient`.
    pub fn create(&self, input: &RecordInput) -> EmissionResult<Record> {
        let measurement = input.to_measurement();
        let (normalized_yearly_tons, coefficient, co2e_per_year) =
            self.derive(&input.gas, &measurement)?;
        let id = RecordId::new(self.ids.next_id());
        debug!(
            id = %id,
            period = ?measurement.period(),
            co2e_per_year,
            resolved = coefficient.is_resolved(),
            "created record"
        );
        Ok(Record::from_parts(
            id,
            input.source_name.clone(),
            input.gas.clone(),
            measurement,
            normalized_yearly_tons,
            coefficient,
            co2e_per_year,
        ))
    }

    /// Rebuilds `id` from edited input; the record keeps its identity.
    pub fn edit(&self, id: &RecordId, input: &RecordInput) -> EmissionResult<Record> {
        self.assemble(
            id.clone(),
            input.source_name.clone(),
            input.gas.clone(),
            input.to_measurement(),
        )
    }

    /// Re-derives a record against the factory's tables, keeping raw fields and id.
    pub fn recompute(&self, record: &Record) -> EmissionResult<Record> {
        self.assemble(
            record.id().clone(),
            record.source_name().to_owned(),
            record.gas().clone(),
            record.measurement().clone(),
        )
    }

    /// Builds a record from a persisted row. Stored derived columns are ignored.
    pub fn restore(&self, stored: &StoredRecord) -> EmissionResult<Record> {
        self.assemble(
            stored.key.clone(),
            stored.source_name.clone(),
            stored.gwp.clone(),
            stored.measurement(),
        )
    }

    fn assemble(
        &self,
        id: RecordId,
        source_name: String,
        gas: GasCode,
        measurement: Measurement,
    ) -> EmissionResult<Record> {
        let (normalized_yearly_tons, coefficient, co2e_per_year) =
            self.derive(&gas, &measurement)?;
        Ok(Record::from_parts(
            id,
            source_name,
            gas,
            measurement,
            normalized_yearly_tons,
            coefficient,
            co2e_per_year,
        ))
    }

    fn derive(
        &self,
        gas: &GasCode,
        measurement: &Measurement,
    ) -> EmissionResult<(Option<f64>, Coefficient, f64)> {
        if let Measurement::Fuel { category, distance } = measurement {
            let coefficient = self.fuel.resolve(category, &gas.to_fuel_unit());
            let co2e_per_year = coefficient.value * distance;
            return Ok((None, coefficient, co2e_per_year));
        }

        let tons = aggregate_yearly_tons(measurement, &self.tables.units)?.unwrap_or(0.0);
        let coefficient = self.tables.gwp.resolve(gas);
        let co2e_per_year = tons * coefficient.value;
        Ok((Some(tons), coefficient, co2e_per_year))
    }
}
