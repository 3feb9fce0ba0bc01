//! Benchmarks for canvas packing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use photopack_engine::{
    minimal_canvas, AspectRatio, BinPacker, Config, Engine, GuillotinePacker, Item,
};

fn mixed_items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            let w = 80 + (i as u32 * 37) % 220;
            let h = 60 + (i as u32 * 53) % 180;
            Item::new(i, w, h).with_padding(5)
        })
        .collect()
}

fn packer_benchmark(c: &mut Criterion) {
    let items = mixed_items(50);
    let packer = GuillotinePacker::default();

    c.bench_function("pack_50_mixed_items", |b| {
        b.iter(|| {
            let result = packer.pack(black_box(&items), black_box(1500), black_box(2121));
            black_box(result)
        })
    });

    c.bench_function("minimal_canvas_50_items", |b| {
        b.iter(|| {
            let canvas = minimal_canvas(&packer, black_box(&items), AspectRatio::A_SERIES);
            black_box(canvas)
        })
    });
}

fn distributor_benchmark(c: &mut Criterion) {
    let items = mixed_items(120);
    let engine = Engine::new(Config::default());

    c.bench_function("pack_120_items_on_4_pages", |b| {
        b.iter(|| {
            let layout = engine.pack(black_box(&items), AspectRatio::A_SERIES, 4);
            black_box(layout)
        })
    });
}

criterion_group!(benches, packer_benchmark, distributor_benchmark);
criterion_main!(benches);
