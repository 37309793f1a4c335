use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use leadlink::{bootstrap, CanonicalStore, Resolver, SimilarityIndex};

fn synthetic_store(count: usize) -> CanonicalStore {
    let records = bootstrap::synthetic_records(count, &mut StdRng::seed_from_u64(7));
    CanonicalStore::from_records(records, "bench").unwrap()
}

fn bench_index_fit(c: &mut Criterion) {
    let store = synthetic_store(1_000);
    c.bench_function("resolve/index_fit_1k", |b| {
        b.iter(|| SimilarityIndex::fit(store.fingerprints()));
    });
}

fn bench_single_resolve(c: &mut Criterion) {
    let resolver = Resolver::new(synthetic_store(1_000));
    c.bench_function("resolve/single_1k", |b| {
        b.iter(|| resolver.resolve("alice smith working at Acme"));
    });
}

fn bench_bulk_resolve(c: &mut Criterion) {
    let store = synthetic_store(1_000);
    let leads = bootstrap::messy_leads(&store, &mut StdRng::seed_from_u64(8));
    let texts: Vec<&str> = leads.iter().map(|l| l.raw_text.as_str()).collect();
    let resolver = Resolver::new(store);

    let mut group = c.benchmark_group("resolve/bulk_1k");
    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("messy_leads", |b| {
        b.iter(|| resolver.bulk_resolve(&texts));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_index_fit,
    bench_single_resolve,
    bench_bulk_resolve
);
criterion_main!(benches);
