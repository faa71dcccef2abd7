// Criterion benchmark comparing the three erase strategies on heavy objects.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use vec_bench_demos::erase::{generate_dataset, EraseCriterion};
use vec_bench_demos::EraseStrategy;

fn benchmark_erase_strategies(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2024);

    for criterion in EraseCriterion::ALL {
        let mut group = c.benchmark_group(format!("erase_{criterion}"));

        for (object_size, len) in [(10, 10_000), (1_000, 10_000)] {
            let data = generate_dataset(&mut rng, object_size, len);
            let pred = criterion.predicate(object_size);

            for strategy in EraseStrategy::ALL {
                group.bench_with_input(
                    BenchmarkId::new(strategy.label(), object_size),
                    &data,
                    |b, data| {
                        b.iter_batched(
                            || data.clone(),
                            |mut v| black_box(strategy.apply(&mut v, &pred)),
                            BatchSize::LargeInput,
                        )
                    },
                );
            }
        }

        group.finish();
    }
}

criterion_group!(benches, benchmark_erase_strategies);
criterion_main!(benches);
