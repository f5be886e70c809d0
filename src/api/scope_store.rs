use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{FuelCoefficientTable, Record, RecordId};
use crate::error::{EmissionError, EmissionResult};

use super::ids::NoIds;
use super::{EmissionTables, IdSource, OrganizationInfo, RecordFactory, RecordInput};

pub const INFO_KEY: &str = "info";
pub const FUEL_COEFFICIENTS_KEY: &str = "coefficientDiff";

/// Top-level grouping key such as `scopeI`, `scopeII` or a numeric index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn scope_i() -> Self {
        Self::new("scopeI")
    }

    #[must_use]
    pub fn scope_ii() -> Self {
        Self::new("scopeII")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `info` and `coefficientDiff` hold configuration, never groups.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.0 == INFO_KEY || self.0 == FUEL_COEFFICIENTS_KEY
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScopeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<usize> for ScopeId {
    fn from(value: usize) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Named, ordered collection of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    group_key: GroupKey,
    group_name: String,
    data_source: Vec<Record>,
}

impl Group {
    #[must_use]
    pub fn new(group_key: GroupKey, group_name: impl Into<String>) -> Self {
        Self {
            group_key,
            group_name: group_name.into(),
            data_source: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        group_key: GroupKey,
        group_name: String,
        records: Vec<Record>,
    ) -> Self {
        Self {
            group_key,
            group_name,
            data_source: records,
        }
    }

    #[must_use]
    pub fn key(&self) -> &GroupKey {
        &self.group_key
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.group_name
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.data_source
    }

    #[must_use]
    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.data_source.iter().find(|record| record.id() == id)
    }

    #[must_use]
    pub fn total_co2e(&self) -> f64 {
        self.data_source.iter().map(Record::co2e_per_year).sum()
    }
}

/// Scope document: configuration keys plus scope id -> ordered groups.
///
/// Every operation borrows `self` and returns a new collection. Groups are
/// shared between versions behind `Arc`; only the group an operation touches
/// is copied, so a retained previous version never observes later edits.
///
/// Loading goes through `from_json_compat_str`, which re-derives every record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScopeCollection {
    #[serde(rename = "info")]
    info: OrganizationInfo,
    #[serde(rename = "coefficientDiff")]
    fuel_coefficients: Arc<FuelCoefficientTable>,
    #[serde(flatten)]
    scopes: IndexMap<ScopeId, Vec<Arc<Group>>>,
}

impl ScopeCollection {
    #[must_use]
    pub fn new(info: OrganizationInfo, fuel_coefficients: FuelCoefficientTable) -> Self {
        Self {
            info,
            fuel_coefficients: Arc::new(fuel_coefficients),
            scopes: IndexMap::new(),
        }
    }

    pub(crate) fn from_parts(
        info: OrganizationInfo,
        fuel_coefficients: FuelCoefficientTable,
        scopes: IndexMap<ScopeId, Vec<Arc<Group>>>,
    ) -> Self {
        Self {
            info,
            fuel_coefficients: Arc::new(fuel_coefficients),
            scopes,
        }
    }

    #[must_use]
    pub fn info(&self) -> &OrganizationInfo {
        &self.info
    }

    #[must_use]
    pub fn fuel_coefficients(&self) -> &FuelCoefficientTable {
        &self.fuel_coefficients
    }

    pub fn scope_ids(&self) -> impl Iterator<Item = &ScopeId> {
        self.scopes.keys()
    }

    /// Groups of `scope` in display order; empty when the scope is absent.
    #[must_use]
    pub fn groups(&self, scope: &ScopeId) -> &[Arc<Group>] {
        self.scopes.get(scope).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn group(&self, scope: &ScopeId, key: &GroupKey) -> Option<&Group> {
        self.groups(scope)
            .iter()
            .find(|group| group.key() == key)
            .map(|group| &**group)
    }

    pub fn records(&self) -> impl Iterator<Item = (&ScopeId, &Group, &Record)> {
        self.scopes.iter().flat_map(|(scope, groups)| {
            groups.iter().flat_map(move |group| {
                group
                    .records()
                    .iter()
                    .map(move |record| (scope, &**group, record))
            })
        })
    }

    /// Record factory bound to this document's fuel table.
    #[must_use]
    pub fn record_factory<'a, I: IdSource>(
        &'a self,
        tables: &'a EmissionTables,
        ids: I,
    ) -> RecordFactory<'a, I> {
        RecordFactory::new(tables, &self.fuel_coefficients, ids)
    }

    /// Appends an empty group with a fresh key at the end of `scope`.
    ///
    /// The scope entry is created when it does not exist yet.
    pub fn add_group(
        &self,
        scope: &ScopeId,
        name: impl Into<String>,
        ids: &impl IdSource,
    ) -> EmissionResult<(Self, GroupKey)> {
        if scope.is_reserved() {
            return Err(EmissionError::ReservedScopeKey {
                key: scope.as_str().to_owned(),
            });
        }

        let key = GroupKey::new(ids.next_id());
        let group = Group::new(key.clone(), name);
        let mut next = self.clone();
        next.scopes
            .entry(scope.clone())
            .or_default()
            .push(Arc::new(group));
        debug!(scope = %scope, group_key = %key, "added group");
        Ok((next, key))
    }

    /// Adds a group named after the organization's company category.
    pub fn add_default_group(
        &self,
        scope: &ScopeId,
        tables: &EmissionTables,
        ids: &impl IdSource,
    ) -> EmissionResult<(Self, GroupKey)> {
        let name = tables.default_group_name(&self.info).to_owned();
        self.add_group(scope, name, ids)
    }

    /// Removes the group whose key matches exactly; a miss returns an equal state.
    #[must_use]
    pub fn remove_group(&self, scope: &ScopeId, key: &GroupKey) -> Self {
        if self.group_index(scope, key).is_none() {
            debug!(scope = %scope, group_key = %key, "remove group: no match, state unchanged");
            return self.clone();
        }

        let mut next = self.clone();
        if let Some(groups) = next.scopes.get_mut(scope) {
            groups.retain(|group| group.key() != key);
        }
        debug!(scope = %scope, group_key = %key, "removed group");
        next
    }

    #[must_use]
    pub fn rename_group(&self, scope: &ScopeId, key: &GroupKey, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update_group(scope, key, |group| group.group_name = name)
            .unwrap_or_else(|| {
                debug!(scope = %scope, group_key = %key, "rename group: no match, state unchanged");
                self.clone()
            })
    }

    /// Appends `record` to the matching group's records.
    pub fn add_record(
        &self,
        scope: &ScopeId,
        key: &GroupKey,
        record: Record,
    ) -> EmissionResult<Self> {
        let record_id = record.id().clone();
        let next = self
            .update_group(scope, key, |group| group.data_source.push(record))
            .ok_or_else(|| EmissionError::UnknownGroup {
                scope: scope.as_str().to_owned(),
                group_key: key.as_str().to_owned(),
            })?;
        debug!(scope = %scope, group_key = %key, record_id = %record_id, "added record");
        Ok(next)
    }

    /// Creates a record from form input and appends it; returns the record for display.
    pub fn submit_record(
        &self,
        scope: &ScopeId,
        key: &GroupKey,
        input: &RecordInput,
        tables: &EmissionTables,
        ids: &impl IdSource,
    ) -> EmissionResult<(Self, Record)> {
        if self.group_index(scope, key).is_none() {
            return Err(EmissionError::UnknownGroup {
                scope: scope.as_str().to_owned(),
                group_key: key.as_str().to_owned(),
            });
        }
        let record = self.record_factory(tables, ids).create(input)?;
        let next = self.add_record(scope, key, record.clone())?;
        Ok((next, record))
    }

    /// Removes the record with identifier `id`. Records sharing its source
    /// name are untouched; a miss returns an equal state.
    #[must_use]
    pub fn remove_record(&self, scope: &ScopeId, key: &GroupKey, id: &RecordId) -> Self {
        let present = self
            .group(scope, key)
            .is_some_and(|group| group.record(id).is_some());
        if !present {
            debug!(
                scope = %scope,
                group_key = %key,
                record_id = %id,
                "remove record: no match, state unchanged"
            );
            return self.clone();
        }

        self.update_group(scope, key, |group| {
            group.data_source.retain(|record| record.id() != id);
        })
        .unwrap_or_else(|| self.clone())
    }

    /// Swaps the stored record carrying `record.id()` for `record`, keeping its position.
    #[must_use]
    pub fn replace_record(&self, scope: &ScopeId, key: &GroupKey, record: Record) -> Self {
        let position = self
            .group(scope, key)
            .and_then(|group| group.records().iter().position(|r| r.id() == record.id()));
        let Some(position) = position else {
            debug!(
                scope = %scope,
                group_key = %key,
                record_id = %record.id(),
                "replace record: no match, state unchanged"
            );
            return self.clone();
        };

        self.update_group(scope, key, |group| group.data_source[position] = record)
            .unwrap_or_else(|| self.clone())
    }

    /// Re-derives every record against `tables` and this document's fuel table.
    pub fn recompute_all(&self, tables: &EmissionTables) -> EmissionResult<Self> {
        let factory = RecordFactory::new(tables, &self.fuel_coefficients, NoIds);
        let mut next = self.clone();
        for groups in next.scopes.values_mut() {
            for group in groups.iter_mut() {
                if group.data_source.is_empty() {
                    continue;
                }
                let records = group
                    .data_source
                    .iter()
                    .map(|record| factory.recompute(record))
                    .collect::<EmissionResult<Vec<_>>>()?;
                Arc::make_mut(group).data_source = records;
            }
        }
        debug!(records = next.records().count(), "recomputed all records");
        Ok(next)
    }

    fn group_index(&self, scope: &ScopeId, key: &GroupKey) -> Option<usize> {
        self.scopes
            .get(scope)?
            .iter()
            .position(|group| group.key() == key)
    }

    fn update_group<F>(&self, scope: &ScopeId, key: &GroupKey, op: F) -> Option<Self>
    where
        F: FnOnce(&mut Group),
    {
        let index = self.group_index(scope, key)?;
        let mut next = self.clone();
        let groups = next.scopes.get_mut(scope)?;
        op(Arc::make_mut(&mut groups[index]));
        Some(next)
    }
}
