use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagecraft_styles::{resolve, InteractionState, NewSource, OverrideEntry, StyleRegistry};

const SOURCES: usize = 500;

fn import(registry: &mut StyleRegistry) -> Vec<String> {
    let requests = (0..SOURCES).map(|_| NewSource::local("div")).collect();
    let ids = registry.batch_create(requests).unwrap();

    let entries = ids
        .iter()
        .flat_map(|id| {
            [
                OverrideEntry::base(id, "padding", "8px"),
                OverrideEntry::base(id, "color", "#333"),
                OverrideEntry::base(id, "padding", "4px").at("mobile"),
                OverrideEntry::base(id, "color", "#000").in_state(InteractionState::Hover),
            ]
        })
        .collect();
    registry.batch_set_overrides(entries).unwrap();
    ids
}

fn batch_import(c: &mut Criterion) {
    c.bench_function("batch_import_500_sources", |b| {
        b.iter(|| {
            let mut registry = StyleRegistry::new();
            import(black_box(&mut registry))
        })
    });
}

fn resolve_many_sources(c: &mut Criterion) {
    let mut registry = StyleRegistry::new();
    let ids = import(&mut registry);
    let stack: Vec<&str> = ids.iter().take(8).map(String::as_str).collect();

    c.bench_function("resolve_8_sources_mobile_hover", |b| {
        b.iter(|| resolve(&registry, black_box(&stack), "mobile", InteractionState::Hover))
    });
}

criterion_group!(benches, batch_import, resolve_many_sources);
criterion_main!(benches);
