use buildscan_dsl::{extract, parse, tokenize, Extractor};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const REALISTIC: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../buildscan-test-utils/fixtures/realistic.gradle.kts"
));

const ALL_CONFIGURATIONS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../buildscan-test-utils/fixtures/all_configurations.gradle.kts"
));

fn bench_tokenize_parse(c: &mut Criterion) {
    c.bench_function("dsl/tokenize_realistic", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(REALISTIC)).expect("tokenize script");
            black_box(tokens.len());
        });
    });

    c.bench_function("dsl/parse_realistic", |b| {
        b.iter(|| {
            let script = parse(black_box(REALISTIC)).expect("parse script");
            black_box(script.statements.len());
        });
    });
}

fn bench_extract(c: &mut Criterion) {
    c.bench_function("extract/realistic", |b| {
        b.iter(|| {
            let report = extract(black_box(REALISTIC)).expect("extract script");
            black_box(report.model.dependencies.len());
        });
    });

    let extractor = Extractor::default();
    let sources: Vec<&str> = (0..64)
        .map(|i| if i % 2 == 0 { REALISTIC } else { ALL_CONFIGURATIONS })
        .collect();
    c.bench_function("extract/batch_64", |b| {
        b.iter(|| {
            let reports = extractor.extract_batch(black_box(&sources));
            black_box(reports.len());
        });
    });
}

criterion_group!(benches, bench_tokenize_parse, bench_extract);
criterion_main!(benches);
