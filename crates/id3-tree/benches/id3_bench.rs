//! Criterion benchmarks for id3-tree: tree induction and batch prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use id3_tree::{AttributeKind, AttributeSchema, Id3Config, RawValue, Record};

fn make_products(n_records: usize, seed: u64) -> (AttributeSchema, Vec<Record>) {
    let schema = AttributeSchema::product();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let records = (0..n_records)
        .map(|_| {
            let values: Vec<RawValue> = schema
                .attributes()
                .iter()
                .map(|attr| match attr.kind() {
                    AttributeKind::Categorical { categories } => {
                        RawValue::category(categories[rng.gen_range(0..categories.len())].clone())
                    }
                    AttributeKind::Continuous => RawValue::number(rng.r#gen::<f64>()),
                })
                .collect();
            // outcome driven by the monthly fee, with 10% label noise
            let fee = match values[2] {
                RawValue::Number(v) => v,
                RawValue::Category(_) => 0.0,
            };
            let positive = (fee > 0.5) ^ (rng.r#gen::<f64>() < 0.1);
            Record::new(values, if positive { "1" } else { "0" })
        })
        .collect();
    (schema, records)
}

fn bench_fit(c: &mut Criterion) {
    let (schema, records) = make_products(2000, 42);
    let config = Id3Config::new();

    c.bench_function("id3_fit_2000_products", |b| {
        b.iter(|| config.fit(&schema, &records).unwrap());
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let (schema, records) = make_products(2000, 42);
    let tree = Id3Config::new().fit(&schema, &records).unwrap();

    c.bench_function("id3_predict_batch_2000_products", |b| {
        b.iter(|| tree.predict_batch(&records).unwrap());
    });
}

criterion_group!(benches, bench_fit, bench_predict_batch);
criterion_main!(benches);
