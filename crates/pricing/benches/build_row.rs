use autoprice_pricing::{FeatureAdapter, FeatureInput, VocabularyMap, CAR_PRICE_SCHEMA};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use serde_json::{json, Map, Value};

const RECORD_COUNT: usize = 256;

fn vocabulary() -> VocabularyMap {
    [
        ("CarName", vec!["audi 100ls", "bmw 320i", "honda civic", "toyota corolla"]),
        ("fueltype", vec!["diesel", "gas"]),
        ("aspiration", vec!["std", "turbo"]),
        ("carbody", vec!["convertible", "hatchback", "sedan", "wagon"]),
        ("cylindernumber", vec!["four", "six", "eight"]),
    ]
    .into_iter()
    .collect()
}

fn generate_records(count: usize) -> Vec<Map<String, Value>> {
    let bodies = ["sedan", "wagon", "coupe", ""];
    (0..count)
        .map(|idx| {
            let mut record = Map::new();
            record.insert("CarName".into(), json!(format!("model-{}", idx % 7)));
            record.insert("carbody".into(), json!(bodies[idx % bodies.len()]));
            record.insert("enginesize".into(), json!(90 + (idx % 120)));
            record.insert("horsepower".into(), json!(format!("{}", 60 + idx % 150)));
            if idx % 3 == 0 {
                record.insert("peakrpm".into(), Value::Null);
            }
            record
        })
        .collect()
}

fn benchmark_build_row(c: &mut Criterion) {
    let vocab = vocabulary();
    let adapter = FeatureAdapter::for_car_prices(&vocab);
    let records = generate_records(RECORD_COUNT);
    let vectors: Vec<Vec<Value>> = (0..RECORD_COUNT)
        .map(|idx| {
            (0..CAR_PRICE_SCHEMA.len())
                .map(|col| json!(idx * col))
                .collect()
        })
        .collect();

    let mut group = c.benchmark_group("build_row");
    group.throughput(Throughput::Elements(RECORD_COUNT as u64));
    group.bench_function("sparse_records", |b| {
        b.iter(|| {
            for record in &records {
                let row = adapter.build_row(&FeatureInput::Record(record.clone()));
                criterion::black_box(row.ok());
            }
        });
    });
    group.bench_function("positional_vectors", |b| {
        b.iter(|| {
            for values in &vectors {
                let row = adapter.build_row(&FeatureInput::Features(values.clone()));
                criterion::black_box(row.ok());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_build_row);
criterion_main!(benches);
