use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{GwpTable, UnitConversionTable};
use crate::error::{EmissionError, EmissionResult};

pub const DEFAULT_FALLBACK_GROUP_NAME: &str = "Office";

/// Organization metadata stored under the reserved `info` key.
///
/// Only `company_category` is read by the engine; everything else is kept
/// verbatim so documents survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_category: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl OrganizationInfo {
    #[must_use]
    pub fn with_company_category(mut self, category: impl Into<String>) -> Self {
        self.company_category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyCategory {
    pub name: String,
    #[serde(rename = "scopeIDefaultValue", default)]
    pub default_group_names: Vec<String>,
}

impl CompanyCategory {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, default_group_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            default_group_names: default_group_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lookup tables consumed by the record factory and the group store.
///
/// Serializable so hosts can ship tables as configuration instead of code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionTables {
    #[serde(default)]
    pub units: UnitConversionTable,
    #[serde(default)]
    pub gwp: GwpTable,
    #[serde(default)]
    pub company_categories: Vec<CompanyCategory>,
    #[serde(default = "default_fallback_group_name")]
    pub fallback_group_name: String,
}

impl Default for EmissionTables {
    fn default() -> Self {
        Self {
            units: UnitConversionTable::default(),
            gwp: GwpTable::default(),
            company_categories: Vec::new(),
            fallback_group_name: default_fallback_group_name(),
        }
    }
}

impl EmissionTables {
    #[must_use]
    pub fn with_units(mut self, units: UnitConversionTable) -> Self {
        self.units = units;
        self
    }

    #[must_use]
    pub fn with_gwp(mut self, gwp: GwpTable) -> Self {
        self.gwp = gwp;
        self
    }

    #[must_use]
    pub fn with_company_category(mut self, category: CompanyCategory) -> Self {
        self.company_categories.push(category);
        self
    }

    #[must_use]
    pub fn with_fallback_group_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_group_name = name.into();
        self
    }

    /// Name given to a freshly added group for this organization.
    #[must_use]
    pub fn default_group_name(&self, info: &OrganizationInfo) -> &str {
        info.company_category
            .as_deref()
            .and_then(|category| {
                self.company_categories
                    .iter()
                    .find(|entry| entry.name == category)
            })
            .and_then(|entry| entry.default_group_names.first())
            .map_or(self.fallback_group_name.as_str(), String::as_str)
    }

    pub fn validate(&self) -> EmissionResult<()> {
        self.units.validate()?;
        self.gwp.validate()?;
        if self.fallback_group_name.trim().is_empty() {
            return Err(EmissionError::InvalidTable(
                "fallback group name must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parses and validates tables from JSON; missing sections use defaults.
    pub fn from_json_str(input: &str) -> EmissionResult<Self> {
        let tables: Self = serde_json::from_str(input)
            .map_err(|e| EmissionError::InvalidTable(format!("failed to parse tables json: {e}")))?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn to_json_pretty(&self) -> EmissionResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| EmissionError::InvalidData(format!("failed to serialize tables: {e}")))
    }
}

fn default_fallback_group_name() -> String {
    DEFAULT_FALLBACK_GROUP_NAME.to_owned()
}
