use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{FuelCoefficientTable, StoredRecord};
use crate::error::{EmissionError, EmissionResult};

use super::ids::NoIds;
use super::{
    EmissionTables, Group, GroupKey, InventorySummary, OrganizationInfo, RecordFactory,
    ScopeCollection, ScopeId,
};

pub const SCOPE_DOCUMENT_JSON_SCHEMA_V1: u32 = 1;
pub const INVENTORY_SUMMARY_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopeDocumentJsonContractV1 {
    pub schema_version: u32,
    pub document: ScopeCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySummaryJsonContractV1 {
    pub schema_version: u32,
    pub summary: InventorySummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGroup {
    group_key: GroupKey,
    #[serde(default)]
    group_name: String,
    #[serde(default)]
    data_source: Vec<StoredRecord>,
}

#[derive(Debug, Deserialize)]
struct StoredScopeDocument {
    #[serde(rename = "info", default)]
    info: OrganizationInfo,
    #[serde(rename = "coefficientDiff", default)]
    fuel_coefficients: FuelCoefficientTable,
    #[serde(flatten)]
    scopes: IndexMap<ScopeId, Vec<StoredGroup>>,
}

#[derive(Debug, Deserialize)]
struct StoredScopeDocumentContractV1 {
    schema_version: u32,
    document: StoredScopeDocument,
}

impl StoredScopeDocument {
    fn restore(self, tables: &EmissionTables) -> EmissionResult<ScopeCollection> {
        let Self {
            info,
            fuel_coefficients,
            scopes: stored_scopes,
        } = self;
        let factory = RecordFactory::new(tables, &fuel_coefficients, NoIds);

        let mut scopes = IndexMap::with_capacity(stored_scopes.len());
        let mut record_count = 0usize;
        for (scope, stored_groups) in stored_scopes {
            let mut groups = Vec::with_capacity(stored_groups.len());
            for stored in stored_groups {
                let records = stored
                    .data_source
                    .iter()
                    .map(|row| factory.restore(row))
                    .collect::<EmissionResult<Vec<_>>>()?;
                record_count += records.len();
                groups.push(Arc::new(Group::from_parts(
                    stored.group_key,
                    stored.group_name,
                    records,
                )));
            }
            scopes.insert(scope, groups);
        }

        debug!(
            scopes = scopes.len(),
            records = record_count,
            "restored scope document"
        );
        Ok(ScopeCollection::from_parts(info, fuel_coefficients, scopes))
    }
}

impl ScopeCollection {
    /// Serializes the bare document: scope keys next to `info` and `coefficientDiff`.
    pub fn to_json_pretty(&self) -> EmissionResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            EmissionError::InvalidData(format!("failed to serialize scope document: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> EmissionResult<String> {
        let payload = ScopeDocumentJsonContractV1 {
            schema_version: SCOPE_DOCUMENT_JSON_SCHEMA_V1,
            document: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            EmissionError::InvalidData(format!("failed to serialize scope document v1: {e}"))
        })
    }

    /// Accepts either the bare document or the versioned envelope.
    ///
    /// Only raw record fields are read; every record is re-derived against
    /// `tables` and the document's own fuel table, so stored totals never
    /// reach the loaded state. Fails with `UnsupportedUnit` when a row's unit
    /// is missing from `tables`.
    ///
    /// The envelope is tried first: a bare document would otherwise swallow
    /// `schema_version` and `document` as scope keys.
    pub fn from_json_compat_str(input: &str, tables: &EmissionTables) -> EmissionResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            EmissionError::InvalidData(format!("failed to parse scope document json: {e}"))
        })?;

        let stored = if value.get("schema_version").is_some() && value.get("document").is_some()
        {
            let payload: StoredScopeDocumentContractV1 =
                serde_json::from_value(value).map_err(|e| {
                    EmissionError::InvalidData(format!(
                        "failed to parse scope document contract: {e}"
                    ))
                })?;
            if payload.schema_version != SCOPE_DOCUMENT_JSON_SCHEMA_V1 {
                return Err(EmissionError::InvalidData(format!(
                    "unsupported scope document schema version: {}",
                    payload.schema_version
                )));
            }
            payload.document
        } else {
            serde_json::from_value::<StoredScopeDocument>(value).map_err(|e| {
                EmissionError::InvalidData(format!("failed to parse scope document: {e}"))
            })?
        };

        stored.restore(tables)
    }

    pub fn summary_json_contract_v1_pretty(&self) -> EmissionResult<String> {
        self.summary().to_json_contract_v1_pretty()
    }
}

impl InventorySummary {
    pub fn to_json_contract_v1_pretty(&self) -> EmissionResult<String> {
        let payload = InventorySummaryJsonContractV1 {
            schema_version: INVENTORY_SUMMARY_JSON_SCHEMA_V1,
            summary: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            EmissionError::InvalidData(format!("failed to serialize summary contract v1: {e}"))
        })
    }
}
