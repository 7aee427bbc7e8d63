//! Pipeline benchmarks: dataset generation and run log parsing
//!
//! Run with: cargo bench --bench pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sum_game_pipeline::config::{GeneratorConfig, Strategy};
use sum_game_pipeline::dataset::DatasetGenerator;
use sum_game_pipeline::reader::SumDataset;
use sum_game_pipeline::results::{parse_log, RunSummary};

const RANGES: [u32; 3] = [50, 200, 500];
const EPOCHS: [usize; 2] = [100, 2_000];

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for range in RANGES {
        for (label, strategy) in [("exhaustive", Strategy::Exhaustive), ("sampled", Strategy::Sampled)] {
            let config = GeneratorConfig::builder()
                .input_range(range)
                .n_train((range * range / 2) as usize)
                .n_dev(range as usize)
                .n_test(range as usize)
                .holdout_pairs(true)
                .strategy(strategy)
                .build()
                .unwrap();
            let generator = DatasetGenerator::new(config).unwrap();
            group.bench_with_input(BenchmarkId::new(label, range), &generator, |b, generator| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(0);
                    black_box(generator.generate_with(&mut rng))
                });
            });
        }
    }

    group.finish();
}

fn bench_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_sum_dataset");

    for range in RANGES {
        let config = GeneratorConfig::builder()
            .input_range(range)
            .n_dev(range as usize)
            .n_test(range as usize)
            .seed(1)
            .build()
            .unwrap();
        let dataset = DatasetGenerator::new(config).unwrap().generate();
        let mut content = Vec::new();
        dataset.train().write_to(&mut content).unwrap();
        let content = String::from_utf8(content).unwrap();

        group.bench_with_input(BenchmarkId::new("parse", range), &content, |b, content| {
            b.iter(|| SumDataset::parse("bench", black_box(content), range).unwrap());
        });
    }

    group.finish();
}

fn run_log(epochs: usize) -> String {
    let mut log = String::from("Namespace()\nNone\n");
    for epoch in 0..epochs {
        #[allow(clippy::cast_precision_loss)]
        let acc = epoch as f64 / epochs as f64;
        for mode in ["train", "test"] {
            log.push_str(&format!(
                "{{\"loss\": 1.0, \"acc\": {acc}, \"sender_entropy\": 1.5, \"length\": 3.0, \"mode\": \"{mode}\", \"epoch\": {epoch}}}\n"
            ));
        }
    }
    log.push_str("INPUTS\n[]\nLABELS\n[]\nMESSAGES\n[]\nOUTPUTS\n[]\n");
    log
}

fn bench_log_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_log");

    for epochs in EPOCHS {
        let log = run_log(epochs);
        group.bench_with_input(BenchmarkId::new("summarize", epochs), &log, |b, log| {
            b.iter(|| {
                let parsed = parse_log("bench", black_box(log)).unwrap();
                black_box(RunSummary::from_records(parsed.train()))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation, bench_reader, bench_log_parsing);
criterion_main!(benches);
