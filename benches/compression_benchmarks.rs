use canon_huff::config::CodecConfig;
use canon_huff::{Codec, DecodeStrategy};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len)
        .map(|_| rng.gen::<u8>().min(rng.gen::<u8>()) / 4)
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let data = sample(1 << 20);
    let codec = Codec::default();
    let mut group = c.benchmark_group("compress");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("skewed_1mib", |b| {
        b.iter(|| codec.compress(black_box(&data)).unwrap())
    });
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let data = sample(1 << 18);
    let compressed = Codec::default().compress(&data).unwrap();
    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for decoder in [DecodeStrategy::LinearScan, DecodeStrategy::LengthIndexed] {
        let codec = Codec::new(CodecConfig {
            decoder,
            ..CodecConfig::default()
        });
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{decoder:?}")),
            &compressed,
            |b, input| b.iter(|| codec.decompress(black_box(input)).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
