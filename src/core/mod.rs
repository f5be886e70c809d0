pub mod coefficient;
pub mod fuel;
pub mod gwp;
pub mod period;
pub mod primitives;
pub mod record;
pub mod units;

pub use coefficient::{Coefficient, CoefficientAdvisory, CoefficientSource};
pub use fuel::{FuelCategory, FuelCoefficient, FuelCoefficientTable};
pub use gwp::{GasCode, GwpEntry, GwpTable};
pub use period::{MONTHS_PER_YEAR, Measurement, MonthlyAmounts, Period, aggregate_yearly_tons};
pub use primitives::{DISPLAY_DECIMALS, round_for_display};
pub use record::{Record, RecordId, STORED_TONNAGE_UNIT, StoredRecord};
pub use units::{UnitCode, UnitConversion, UnitConversionTable, UnitFamily};
