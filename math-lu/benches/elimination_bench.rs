use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_audio_lu::{eliminate_parallel, eliminate_serial, random_diagonally_dominant};

fn bench_elimination(c: &mut Criterion) {
    let mut group = c.benchmark_group("lu_elimination");
    group.sample_size(20);

    for n in [64, 256, 512] {
        let input = random_diagonally_dominant(n, Some(42)).unwrap();

        group.bench_with_input(BenchmarkId::new("serial", n), &input, |b, input| {
            b.iter(|| {
                let mut m = input.clone();
                eliminate_serial(black_box(&mut m));
                m
            })
        });

        for workers in [2, 4, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("parallel_{workers}"), n),
                &input,
                |b, input| {
                    b.iter(|| {
                        let mut m = input.clone();
                        eliminate_parallel(black_box(&mut m), workers).unwrap();
                        m
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_elimination);
criterion_main!(benches);
