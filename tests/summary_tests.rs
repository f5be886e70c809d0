use approx::assert_relative_eq;
use rust_decimal::Decimal;

use carbon_ledger::api::{
    EmissionTables, OrganizationInfo, RecordInput, ScopeCollection, ScopeId, SequentialIds,
};
use carbon_ledger::core::{FuelCoefficientTable, GwpTable, round_for_display};

fn inventory() -> ScopeCollection {
    let ids = SequentialIds::new("id");
    let tables = EmissionTables::default();
    let scope_i = ScopeId::scope_i();
    let scope_ii = ScopeId::scope_ii();
    let document =
        ScopeCollection::new(OrganizationInfo::default(), FuelCoefficientTable::default());

    let (document, plant) = document.add_group(&scope_i, "Plant", &ids).expect("plant");
    let (document, fleet) = document.add_group(&scope_i, "Fleet", &ids).expect("fleet");
    let (document, office) = document.add_group(&scope_ii, "Office", &ids).expect("office");

    let entries = [
        (&scope_i, &plant, RecordInput::yearly("boiler", "CH4", 1.0, "t")),
        (&scope_i, &plant, RecordInput::yearly("furnace", "CO2", 12.0, "t")),
        (&scope_i, &fleet, RecordInput::yearly("vans", "CO2", 30.0, "t")),
        (&scope_ii, &office, RecordInput::yearly("lighting", "CO2", 4.0, "t")),
    ];
    entries
        .into_iter()
        .fold(document, |document, (scope, key, input)| {
            document
                .submit_record(scope, key, &input, &tables, &ids)
                .expect("record")
                .0
        })
}

#[test]
fn group_and_scope_totals_sum_co2e() {
    let document = inventory();
    let scope_i = ScopeId::scope_i();

    let groups = document.groups(&scope_i);
    assert_eq!(groups[0].total_co2e(), 40.0);
    assert_eq!(groups[1].total_co2e(), 30.0);
    assert_relative_eq!(document.scope_total(&scope_i), 70.0, epsilon = 1e-9);
    assert_relative_eq!(document.scope_total(&ScopeId::scope_ii()), 4.0, epsilon = 1e-9);
    assert_relative_eq!(document.total_co2e(), 74.0, epsilon = 1e-9);
}

#[test]
fn missing_scope_totals_zero() {
    assert_eq!(inventory().scope_total(&ScopeId::new("scopeIII")), 0.0);
}

#[test]
fn summary_lists_scopes_and_groups_in_order() {
    let summary = inventory().summary();

    let scope_ids: Vec<&str> = summary.scopes.keys().map(ScopeId::as_str).collect();
    assert_eq!(scope_ids, vec!["scopeI", "scopeII"]);

    let scope_i = &summary.scopes[&ScopeId::scope_i()];
    assert_eq!(scope_i.groups.len(), 2);
    assert_eq!(scope_i.groups[0].group_name, "Plant");
    assert_eq!(scope_i.groups[0].record_count, 2);
    assert_eq!(scope_i.groups[0].unresolved_count, 0);
    assert_relative_eq!(summary.co2e_per_year, 74.0, epsilon = 1e-9);
}

#[test]
fn summary_counts_unresolved_coefficients() {
    let ids = SequentialIds::new("id");
    let tables = EmissionTables::default().with_gwp(GwpTable::empty());
    let scope = ScopeId::scope_i();
    let (document, key) = ScopeCollection::default()
        .add_group(&scope, "Plant", &ids)
        .expect("group");
    let (document, _) = document
        .submit_record(&scope, &key, &RecordInput::yearly("boiler", "HFC-999", 1.0, "t"), &tables, &ids)
        .expect("record");

    let summary = document.summary();
    assert_eq!(summary.scopes[&scope].groups[0].unresolved_count, 1);
    assert_eq!(summary.co2e_per_year, 0.0);
}

#[test]
fn largest_sources_rank_by_co2e_descending() {
    let ranked = inventory().largest_sources(3);

    let names: Vec<&str> = ranked.iter().map(|entry| entry.source_name.as_str()).collect();
    assert_eq!(names, vec!["vans", "boiler", "furnace"]);
    assert_eq!(ranked[0].scope, ScopeId::scope_i());
    assert_eq!(ranked[0].co2e_per_year, 30.0);
}

#[test]
fn largest_sources_break_ties_by_name() {
    let ids = SequentialIds::new("id");
    let tables = EmissionTables::default();
    let scope = ScopeId::scope_i();
    let (document, key) = ScopeCollection::default()
        .add_group(&scope, "Plant", &ids)
        .expect("group");
    let (document, _) = document
        .submit_record(&scope, &key, &RecordInput::yearly("zeta", "CO2", 5.0, "t"), &tables, &ids)
        .expect("zeta");
    let (document, _) = document
        .submit_record(&scope, &key, &RecordInput::yearly("alpha", "CO2", 5.0, "t"), &tables, &ids)
        .expect("alpha");

    let ranked = document.largest_sources(10);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].source_name, "alpha");
    assert_eq!(ranked[1].source_name, "zeta");
}

#[test]
fn display_rounding_uses_three_decimals() {
    let rounded = round_for_display(0.1 * 28.0, 3).expect("finite");
    assert_eq!(rounded, Decimal::new(2800, 3));

    let half = round_for_display(0.125, 2).expect("finite");
    assert_eq!(half, Decimal::new(13, 2));

    assert!(round_for_display(f64::NAN, 3).is_err());
}

#[test]
fn scope_total_matches_ordered_group_sum_within_tolerance() {
    let ids = SequentialIds::new("id");
    let tables = EmissionTables::default();
    let scope = ScopeId::scope_i();
    let mut document = ScopeCollection::default();

    for g in 0..64 {
        let (next, key) = document
            .add_group(&scope, format!("site-{g}"), &ids)
            .expect("group");
        document = next;
        let amount = 0.1 + f64::from(g) * 1.7e-3;
        let input = RecordInput::yearly("boiler", "CH4", amount, "kg");
        document = document
            .submit_record(&scope, &key, &input, &tables, &ids)
            .expect("record")
            .0;
    }

    let ordered: f64 = document
        .groups(&scope)
        .iter()
        .map(|group| group.total_co2e())
        .sum();
    assert_relative_eq!(document.scope_total(&scope), ordered, max_relative = 1e-12);
    assert_relative_eq!(document.total_co2e(), ordered, max_relative = 1e-12);
}
