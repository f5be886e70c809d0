mod ids;
mod json_contract;
mod record_factory;
mod scope_store;
mod summary;
mod tables;

pub use ids::{IdSource, SequentialIds, UuidIds};
pub use json_contract::{
    INVENTORY_SUMMARY_JSON_SCHEMA_V1, InventorySummaryJsonContractV1,
    SCOPE_DOCUMENT_JSON_SCHEMA_V1, ScopeDocumentJsonContractV1,
};
pub use record_factory::{RecordFactory, RecordInput};
pub use scope_store::{FUEL_COEFFICIENTS_KEY, Group, GroupKey, INFO_KEY, ScopeCollection, ScopeId};
pub use summary::{GroupSummary, InventorySummary, RankedSource, ScopeSummary};
pub use tables::{
    CompanyCategory, DEFAULT_FALLBACK_GROUP_NAME, EmissionTables, OrganizationInfo,
};
