use carbon_ledger::EmissionError;
use carbon_ledger::api::{
    CompanyCategory, DEFAULT_FALLBACK_GROUP_NAME, EmissionTables, OrganizationInfo,
};
use carbon_ledger::core::{GasCode, GwpEntry, GwpTable, UnitCode, UnitConversion, UnitConversionTable};

#[test]
fn default_tables_validate() {
    let tables = EmissionTables::default();
    tables.validate().expect("defaults are valid");
    assert_eq!(tables.fallback_group_name, DEFAULT_FALLBACK_GROUP_NAME);
    assert!(!tables.units.is_empty());
    assert!(!tables.gwp.is_empty());
}

#[test]
fn json_sections_override_defaults_and_missing_sections_keep_them() {
    let json = r#"{
        "gwp": { "CH4": { "label": "Methane", "ar5": 28.0 } },
        "company_categories": [
            { "name": "hospital", "scopeIDefaultValue": ["Ward", "Lab"] }
        ]
    }"#;
    let tables = EmissionTables::from_json_str(json).expect("tables");

    assert_eq!(tables.gwp.len(), 1);
    assert_eq!(tables.gwp.label(&GasCode::new("CH4")), Some("Methane"));
    assert_eq!(tables.units, UnitConversionTable::default());
    assert_eq!(tables.fallback_group_name, "Office");
    assert_eq!(
        tables.default_group_name(&OrganizationInfo::default().with_company_category("hospital")),
        "Ward"
    );
}

#[test]
fn unit_table_json_uses_family_and_multiplier() {
    let json = r#"{
        "units": {
            "kg": { "family": "mass", "tons_per_unit": 0.001 },
            "kWh": { "family": "energy", "tons_per_unit": 0.000509 }
        }
    }"#;
    let tables = EmissionTables::from_json_str(json).expect("tables");

    assert_eq!(tables.units.len(), 2);
    assert_eq!(
        tables.units.get(&UnitCode::new("kWh")).map(|c| c.tons_per_unit),
        Some(0.000509)
    );
}

#[test]
fn negative_coefficient_is_rejected() {
    let tables = EmissionTables::default()
        .with_gwp(GwpTable::empty().with_gas("CO2", GwpEntry::new("CO2", -1.0)));
    assert!(matches!(tables.validate(), Err(EmissionError::InvalidTable(_))));
}

#[test]
fn non_finite_multiplier_is_rejected() {
    let tables = EmissionTables::default().with_units(
        UnitConversionTable::empty().with_unit("kg", UnitConversion::mass(f64::INFINITY)),
    );
    assert!(matches!(tables.validate(), Err(EmissionError::InvalidTable(_))));
}

#[test]
fn empty_fallback_group_name_is_rejected() {
    let tables = EmissionTables::default().with_fallback_group_name("  ");
    assert!(tables.validate().is_err());
}

#[test]
fn malformed_tables_json_is_invalid_table() {
    let err = EmissionTables::from_json_str("[1, 2]").expect_err("not an object");
    assert!(matches!(err, EmissionError::InvalidTable(_)));
}

#[test]
fn default_group_name_falls_back_when_category_unknown_or_empty() {
    let tables = EmissionTables::default()
        .with_company_category(CompanyCategory::new("retail", Vec::<String>::new()))
        .with_fallback_group_name("Headquarters");

    let unknown = OrganizationInfo::default().with_company_category("mining");
    let empty = OrganizationInfo::default().with_company_category("retail");

    assert_eq!(tables.default_group_name(&unknown), "Headquarters");
    assert_eq!(tables.default_group_name(&empty), "Headquarters");
    assert_eq!(tables.default_group_name(&OrganizationInfo::default()), "Headquarters");
}

#[test]
fn tables_survive_json_round_trip() {
    let tables = EmissionTables::default()
        .with_company_category(CompanyCategory::new("retail", ["Store"]));
    let json = tables.to_json_pretty().expect("serialize");

    assert_eq!(EmissionTables::from_json_str(&json).expect("parse"), tables);
}
