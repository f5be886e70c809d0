use approx::assert_relative_eq;
use carbon_ledger::api::{
    CompanyCategory, EmissionTables, OrganizationInfo, RecordInput, ScopeCollection, ScopeId,
    SequentialIds,
};
use carbon_ledger::core::{FuelCategory, FuelCoefficientTable, round_for_display};
use rust_decimal::Decimal;

#[test]
fn inventory_smoke_flow() {
    let ids = SequentialIds::new("s");
    let tables = EmissionTables::default()
        .with_company_category(CompanyCategory::new("factory", ["Plant A"]));
    let fuel = FuelCoefficientTable::default()
        .with_category(FuelCategory::new("truck").with_coefficient("CO2", 0.5));
    let info = OrganizationInfo::default().with_company_category("factory");
    let scope_i = ScopeId::scope_i();
    let scope_ii = ScopeId::scope_ii();

    let document = ScopeCollection::new(info, fuel);
    let (document, plant) = document
        .add_default_group(&scope_i, &tables, &ids)
        .expect("default group");
    let (document, office) = document
        .add_group(&scope_ii, "Office", &ids)
        .expect("office group");
    assert_eq!(document.group(&scope_i, &plant).expect("plant").name(), "Plant A");

    let (document, boiler) = document
        .submit_record(
            &scope_i,
            &plant,
            &RecordInput::yearly("boiler", "CH4", 100.0, "kg"),
            &tables,
            &ids,
        )
        .expect("boiler");
    let (document, _) = document
        .submit_record(
            &scope_i,
            &plant,
            &RecordInput::fuel("deliveries", "co2", "truck", 40.0),
            &tables,
            &ids,
        )
        .expect("deliveries");
    let (document, _) = document
        .submit_record(
            &scope_ii,
            &office,
            &RecordInput::monthly("grid", "CO2", [1.0; 12], "t"),
            &tables,
            &ids,
        )
        .expect("grid");

    assert_relative_eq!(boiler.co2e_per_year(), 2.8, epsilon = 1e-9);
    assert_relative_eq!(document.scope_total(&scope_i), 22.8, epsilon = 1e-9);
    assert_relative_eq!(document.scope_total(&scope_ii), 12.0, epsilon = 1e-9);
    assert_relative_eq!(document.total_co2e(), 34.8, epsilon = 1e-9);

    let ranked = document.largest_sources(2);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].source_name, "deliveries");
    assert_eq!(ranked[1].source_name, "grid");

    let without_boiler = document.remove_record(&scope_i, &plant, boiler.id());
    assert_relative_eq!(without_boiler.scope_total(&scope_i), 20.0, epsilon = 1e-9);
    assert_relative_eq!(document.scope_total(&scope_i), 22.8, epsilon = 1e-9);

    let json = without_boiler
        .to_json_contract_v1_pretty()
        .expect("serialize");
    let restored = ScopeCollection::from_json_compat_str(&json, &tables).expect("restore");
    assert_eq!(restored, without_boiler);

    assert_eq!(
        round_for_display(restored.total_co2e(), 3).expect("finite"),
        Decimal::new(32_000, 3)
    );
}
