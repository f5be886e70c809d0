use std::cmp::Ordering;
use std::sync::Arc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
#[cfg(feature = "parallel-totals")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{Record, RecordId};

use super::{Group, GroupKey, ScopeCollection, ScopeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_key: GroupKey,
    pub group_name: String,
    pub record_count: usize,
    pub co2e_per_year: f64,
    /// Records whose coefficient fell back to zero.
    pub unresolved_count: usize,
}

impl GroupSummary {
    fn from_group(group: &Group) -> Self {
        Self {
            group_key: group.key().clone(),
            group_name: group.name().to_owned(),
            record_count: group.records().len(),
            co2e_per_year: group.total_co2e(),
            unresolved_count: group
                .records()
                .iter()
                .filter(|record| !record.coefficient().is_resolved())
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSummary {
    pub groups: Vec<GroupSummary>,
    pub co2e_per_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub scopes: IndexMap<ScopeId, ScopeSummary>,
    pub co2e_per_year: f64,
}

/// One entry of the largest-sources ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSource {
    pub scope: ScopeId,
    pub group_key: GroupKey,
    pub record_id: RecordId,
    pub source_name: String,
    pub co2e_per_year: f64,
}

impl ScopeCollection {
    /// Sum of group totals in `scope`.
    ///
    /// With `parallel-totals` the addition order follows rayon's split, so the
    /// result may differ from the sequential build in the last bits.
    #[must_use]
    pub fn scope_total(&self, scope: &ScopeId) -> f64 {
        sum_group_totals(self.groups(scope))
    }

    #[must_use]
    pub fn total_co2e(&self) -> f64 {
        self.scope_ids().map(|scope| self.scope_total(scope)).sum()
    }

    #[must_use]
    pub fn summary(&self) -> InventorySummary {
        let scopes: IndexMap<ScopeId, ScopeSummary> = self
            .scope_ids()
            .map(|scope| {
                let groups = self.groups(scope);
                let summary = ScopeSummary {
                    groups: groups
                        .iter()
                        .map(|group| GroupSummary::from_group(group))
                        .collect(),
                    co2e_per_year: sum_group_totals(groups),
                };
                (scope.clone(), summary)
            })
            .collect();
        let co2e_per_year = scopes.values().map(|scope| scope.co2e_per_year).sum();
        InventorySummary {
            scopes,
            co2e_per_year,
        }
    }

    /// The `limit` records with the highest yearly CO2e.
    ///
    /// Ties order by source name, then record id, so the ranking is stable
    /// across runs.
    #[must_use]
    pub fn largest_sources(&self, limit: usize) -> Vec<RankedSource> {
        let mut ranked: Vec<(&ScopeId, &Group, &Record)> = self.records().collect();
        ranked.sort_by(|a, b| compare_ranked(a.2, b.2));
        ranked
            .into_iter()
            .take(limit)
            .map(|(scope, group, record)| RankedSource {
                scope: scope.clone(),
                group_key: group.key().clone(),
                record_id: record.id().clone(),
                source_name: record.source_name().to_owned(),
                co2e_per_year: record.co2e_per_year(),
            })
            .collect()
    }
}

fn compare_ranked(a: &Record, b: &Record) -> Ordering {
    OrderedFloat(b.co2e_per_year())
        .cmp(&OrderedFloat(a.co2e_per_year()))
        .then_with(|| a.source_name().cmp(b.source_name()))
        .then_with(|| a.id().cmp(b.id()))
}

fn sum_group_totals(groups: &[Arc<Group>]) -> f64 {
    #[cfg(feature = "parallel-totals")]
    {
        groups.par_iter().map(|group| group.total_co2e()).sum()
    }

    #[cfg(not(feature = "parallel-totals"))]
    {
        groups.iter().map(|group| group.total_co2e()).sum()
    }
}
