use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use trifactor::demo_utils::{attempt, enroll_request, synthetic_hand_sequence, synthetic_voice};
use trifactor::{
    EmbeddingComparator, GestureMatchConfig, GestureMatcher, GestureNormalizer,
    InMemoryTemplateStore, NormalizeConfig, TrifactorConfig, VoiceConfig,
};

/// Full verify path with the production embedding dimension.
fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    let verifier = TrifactorConfig::default()
        .build_verifier()
        .expect("verifier");
    let store = InMemoryTemplateStore::new();
    let template = verifier
        .enroll_and_store(&store, enroll_request("bench", "open sesame", 1, 192))
        .expect("enroll");

    let accepted = attempt("bench", "open sesame", 1, 192);
    let passphrase_reject = attempt("bench", "close sesame", 1, 192);
    let voice_reject = attempt("bench", "open sesame", 2, 192);

    group.bench_function("accepted", |b| {
        b.iter(|| verifier.verify(black_box(&accepted), black_box(&template)))
    });
    group.bench_function("passphrase_reject", |b| {
        b.iter(|| verifier.verify(black_box(&passphrase_reject), black_box(&template)))
    });
    group.bench_function("voice_reject", |b| {
        b.iter(|| verifier.verify(black_box(&voice_reject), black_box(&template)))
    });
    group.finish();
}

/// Gesture normalization and alignment across capture lengths.
fn bench_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture");
    let normalizer = GestureNormalizer::new(NormalizeConfig::default()).expect("normalizer");
    let matcher = GestureMatcher::new(GestureMatchConfig::default()).expect("matcher");

    for frames in [30usize, 90, 300] {
        let raw = synthetic_hand_sequence(frames, 1.0, [0.2, 0.2, 0.0]);
        let template = normalizer.normalize(&raw).expect("normalize");
        let input = normalizer
            .normalize(&synthetic_hand_sequence(frames + frames / 3, 0.8, [0.0, 0.1, 0.0]))
            .expect("normalize");

        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::new("normalize", frames), &raw, |b, raw| {
            b.iter(|| normalizer.normalize(black_box(raw)))
        });
        group.bench_with_input(BenchmarkId::new("compare", frames), &input, |b, input| {
            b.iter(|| matcher.compare(black_box(input), black_box(&template)))
        });
    }
    group.finish();
}

fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("voice");
    for dim in [192usize, 512] {
        let comparator = EmbeddingComparator::new(VoiceConfig {
            dimension: dim,
            ..Default::default()
        })
        .expect("comparator");
        let a = synthetic_voice(1, dim);
        let b = synthetic_voice(2, dim);
        group.bench_with_input(BenchmarkId::new("similarity", dim), &dim, |bench, _| {
            bench.iter(|| comparator.similarity(black_box(&a), black_box(&b)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_verify, bench_gesture, bench_voice);
criterion_main!(benches);
