use carbon_ledger::api::{
    EmissionTables, OrganizationInfo, RecordInput, ScopeCollection, ScopeId, SequentialIds,
};
use carbon_ledger::core::{FuelCoefficientTable, UnitCode};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_unit_conversion(c: &mut Criterion) {
    let tables = EmissionTables::default();
    let kg = UnitCode::new("kg");

    c.bench_function("unit_conversion_kg", |b| {
        b.iter(|| {
            let _ = tables
                .units
                .convert(black_box(4_321.123), &kg)
                .expect("kg is supported");
        })
    });
}

fn bench_monthly_record_creation(c: &mut Criterion) {
    let tables = EmissionTables::default();
    let fuel = FuelCoefficientTable::default();
    let ids = SequentialIds::new("bench");
    let factory = carbon_ledger::RecordFactory::new(&tables, &fuel, &ids);
    let input = RecordInput::monthly("boiler", "CH4", [125.0; 12], "kg");

    c.bench_function("monthly_record_creation", |b| {
        b.iter(|| {
            let _ = factory.create(black_box(&input)).expect("valid input");
        })
    });
}

fn bench_summary_10k(c: &mut Criterion) {
    let tables = EmissionTables::default();
    let ids = SequentialIds::new("bench");
    let scope = ScopeId::scope_i();
    let mut document =
        ScopeCollection::new(OrganizationInfo::default(), FuelCoefficientTable::default());

    for g in 0..100 {
        let (next, key) = document
            .add_group(&scope, format!("site-{g}"), &ids)
            .expect("group");
        document = next;
        for r in 0..100 {
            let input =
                RecordInput::yearly(format!("source-{r}"), "CO2", f64::from(r) * 10.0, "t");
            let (next, _) = document
                .submit_record(&scope, &key, &input, &tables, &ids)
                .expect("record");
            document = next;
        }
    }

    c.bench_function("inventory_summary_10k", |b| {
        b.iter(|| {
            let _ = black_box(&document).summary();
        })
    });

    c.bench_function("largest_sources_10k", |b| {
        b.iter(|| {
            let _ = black_box(&document).largest_sources(10);
        })
    });
}

criterion_group!(
    benches,
    bench_unit_conversion,
    bench_monthly_record_creation,
    bench_summary_10k
);
criterion_main!(benches);
