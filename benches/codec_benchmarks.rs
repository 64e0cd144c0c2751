use std::{hint::black_box, sync::Arc};

use criterion::{criterion_group, criterion_main, Criterion};
use plugdata::{BinaryCodec, Ext, MemorySource, PersistenceGateway, SerializerRegistry, ValueStore};

fn sample_store(n: usize) -> ValueStore {
    let mut store = ValueStore::new();
    for i in 0..n {
        match i % 4 {
            0 => store.set(format!("int{i}"), i as i32),
            1 => store.set(format!("long{i}"), i as i64 * 1_000_000_007),
            2 => store.set(format!("str{i}"), format!("value number {i}")),
            _ => store.set(format!("blob{i}"), Ext(vec![i as u8; 64])),
        };
    }
    store
}

fn bench_write_store(c: &mut Criterion) {
    let store = sample_store(100);
    let mut codec = BinaryCodec::new(Arc::new(SerializerRegistry::with_defaults()));
    c.bench_function("write_store 100 mixed", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(8 * 1024);
            codec.write_store(&mut buf, black_box(&store)).unwrap();
            black_box(buf);
        })
    });
}

fn bench_read_store(c: &mut Criterion) {
    let store = sample_store(100);
    let mut codec = BinaryCodec::new(Arc::new(SerializerRegistry::with_defaults()));
    let mut encoded = Vec::new();
    codec.write_store(&mut encoded, &store).unwrap();

    c.bench_function("read_store 100 mixed", |b| {
        b.iter(|| {
            let records = codec.read_store(&mut black_box(encoded.as_slice())).unwrap();
            black_box(records);
        })
    });
}

fn bench_gateway_save(c: &mut Criterion) {
    let store = sample_store(100);
    let mut gw = PersistenceGateway::new(
        MemorySource::new(),
        Arc::new(SerializerRegistry::with_defaults()),
    );
    c.bench_function("gateway save 100 mixed (gzip)", |b| {
        b.iter(|| gw.save(black_box(&store)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_write_store,
    bench_read_store,
    bench_gateway_save
);
criterion_main!(benches);
