use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use ngn_dex_core::amm::swap::get_amount_out;
use ngn_dex_core::{Wad, WAD};

#[inline]
fn w(n: u128) -> Wad {
    n * WAD
}

fn bench_swap(c: &mut Criterion) {
    let mut g = c.benchmark_group("swap");
    g.warm_up_time(Duration::from_secs(2));
    g.measurement_time(Duration::from_secs(5));
    g.sample_size(300);
    g.throughput(Throughput::Elements(1));

    // pools NGN/ação com rótulo único + taxa em bps
    let cases: [(&str, Wad, Wad, Wad, u32); 6] = [
        ("ngn_small", w(100_000), w(1_000), w(1_000), 0u32),
        ("ngn_large", w(5_000_000_000), w(50_000_000), w(1_000_000), 0u32),
        ("deep_ngn", w(1_000_000_000), w(1_000_000), w(1_000), 0u32),
        ("deep_stock", w(1_000_000), w(1_000_000_000), w(1_000), 0u32),
        ("ngn_small_fee", w(100_000), w(1_000), w(1_000), 30u32),
        ("deep_ngn_fee", w(1_000_000_000), w(1_000_000), w(1_000), 30u32),
    ];

    for (label, reserve_in, reserve_out, dx, fee) in cases {
        let name = format!("{}_f{}", label, fee);
        g.bench_function(name, |b| {
            b.iter(|| {
                let dy = get_amount_out(
                    black_box(reserve_in),
                    black_box(reserve_out),
                    black_box(dx),
                    black_box(fee),
                )
                .unwrap();
                black_box(dy);
            });
        });
    }
    g.finish();
}

criterion_group!(benches, bench_swap);
criterion_main!(benches);
