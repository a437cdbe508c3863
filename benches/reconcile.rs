use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lingscribe::reconcile::{self, ReconcileConfig};
use lingscribe::segment::{ChunkingConfig, plan_by_duration};
use lingscribe::transcript::{self, ChunkResult, TranscriptLine};

/// Build synthetic chunk results: one line every two seconds, every line
/// duplicated into the following chunk's overlap region.
fn synthetic_results(windows: &[lingscribe::segment::ChunkWindow]) -> Vec<ChunkResult> {
    windows
        .iter()
        .map(|window| {
            let mut lines = Vec::new();
            let mut t = 0.0;
            while t < window.duration_seconds {
                let global = window.start_seconds + t;
                lines.push(TranscriptLine {
                    speaker: "Speaker 1".to_string(),
                    english: format!("utterance number {global}"),
                    chinese: "第若干句".to_string(),
                    start_time_in_seconds: t,
                    end_time_in_seconds: t + 1.5,
                });
                t += 2.0;
            }
            ChunkResult {
                transcript: lines,
                vocabulary: Vec::new(),
            }
        })
        .collect()
}

fn bench_reconcile(c: &mut Criterion) {
    let chunking = ChunkingConfig::default();

    let mut group = c.benchmark_group("reconcile");
    for hours in [0.5f64, 2.0] {
        let total = hours * 3600.0;
        let windows = plan_by_duration(total, &chunking).expect("valid plan");
        let results = synthetic_results(&windows);

        group.bench_with_input(
            BenchmarkId::new("tiling", format!("{hours}h")),
            &(windows, results),
            |b, (windows, results)| {
                b.iter(|| {
                    let merged = reconcile::merge(
                        black_box(windows),
                        black_box(results.clone()),
                        &chunking,
                        &ReconcileConfig::default(),
                    );
                    black_box(merged)
                })
            },
        );

        let fuzzy = ReconcileConfig {
            fuzzy_dedup: true,
            ..Default::default()
        };
        let windows = plan_by_duration(total, &chunking).expect("valid plan");
        let results = synthetic_results(&windows);
        group.bench_with_input(
            BenchmarkId::new("tiling-fuzzy", format!("{hours}h")),
            &(windows, results),
            |b, (windows, results)| {
                b.iter(|| {
                    let mut merged = reconcile::merge(
                        black_box(windows),
                        black_box(results.clone()),
                        &chunking,
                        &fuzzy,
                    );
                    transcript::sort_transcript(&mut merged);
                    black_box(merged)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
