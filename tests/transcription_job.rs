//! End-to-end job tests against the public API with scripted collaborators.

use lingscribe::audio::{MockDecoder, MockEncoder};
use lingscribe::oracle::ScriptedOracle;
use lingscribe::progress::CollectingReporter;
use lingscribe::{
    ChunkResult, JobConfig, LingscribeError, TranscriptLine, TranscriptionJob, VocabularyItem,
};
use std::sync::Arc;

fn line(speaker: &str, english: &str, chinese: &str, start: f64, end: f64) -> TranscriptLine {
    TranscriptLine {
        speaker: speaker.to_string(),
        english: english.to_string(),
        chinese: chinese.to_string(),
        start_time_in_seconds: start,
        end_time_in_seconds: end,
    }
}

fn word(word: &str, definition: &str) -> VocabularyItem {
    VocabularyItem {
        word: word.to_string(),
        ipa: String::new(),
        definition: definition.to_string(),
        example: String::new(),
    }
}

fn quiet_config() -> JobConfig {
    let mut config = JobConfig::default();
    config.scheduler.stagger_ms = 0;
    config
}

fn job_with(oracle: ScriptedOracle, duration_seconds: f64) -> TranscriptionJob {
    TranscriptionJob::new(quiet_config(), Arc::new(oracle))
        .with_decoder(Arc::new(
            MockDecoder::new().with_duration_seconds(duration_seconds),
        ))
        .with_encoder(Arc::new(MockEncoder::new()))
}

#[tokio::test]
async fn reference_scenario_400s_tiling() {
    // 400s at window 180 / overlap 20 → step 160 → chunks at [0, 160, 320].
    // Chunk 2 (last, 80s long) owns all of its lines; chunks 0 and 1 own
    // only lines with relative start below 160.
    let oracle = ScriptedOracle::new()
        .with_result(
            0,
            ChunkResult {
                transcript: vec![
                    line("Host", "Welcome to the show.", "欢迎收听节目。", 1.0, 3.0),
                    line("Host", "Seen again by chunk one.", "重复内容。", 170.0, 172.0),
                ],
                vocabulary: vec![word("welcome", "a greeting")],
            },
        )
        .with_result(
            1,
            ChunkResult {
                transcript: vec![
                    // Same utterance as chunk 0's second line, now inside
                    // chunk 1's own tile (global 160 + 10).
                    line("Host", "Seen again by chunk one.", "重复内容。", 10.0, 12.0),
                    line("Guest", "Thanks for having me.", "谢谢邀请。", 50.0, 52.0),
                ],
                vocabulary: vec![word("Welcome", "duplicate, discarded")],
            },
        )
        .with_result(
            2,
            ChunkResult {
                transcript: vec![line("Host", "Goodbye.", "再见。", 75.0, 78.0)],
                vocabulary: vec![word("goodbye", "a farewell")],
            },
        );

    let result = job_with(oracle, 400.0).run(b"audio").await.unwrap();

    let starts: Vec<f64> = result
        .transcript
        .iter()
        .map(|l| l.start_time_in_seconds)
        .collect();
    assert_eq!(starts, vec![1.0, 170.0, 210.0, 395.0]);

    // Chunk 0's copy of the boundary utterance was outside its tile and
    // dropped; chunk 1's copy survives at global 170.
    assert_eq!(result.transcript[1].english, "Seen again by chunk one.");

    let words: Vec<&str> = result.vocabulary.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(words, vec!["welcome", "goodbye"]);
    assert_eq!(result.vocabulary[0].definition, "a greeting");
}

#[tokio::test]
async fn overlap_duplicate_deduplicated_fuzzily() {
    // Two chunks report the same utterance: near-boundary in chunk 0
    // (relative 159.9) and just after the start of chunk 1 (relative 0.05,
    // global 160.05). With the fuzzy net on, exactly one survives.
    let oracle = ScriptedOracle::new()
        .with_result(
            0,
            ChunkResult {
                transcript: vec![line(
                    "Host",
                    "and that brings us to the point",
                    "说到重点",
                    159.9,
                    162.0,
                )],
                vocabulary: vec![],
            },
        )
        .with_result(
            1,
            ChunkResult {
                transcript: vec![line(
                    "Host",
                    "And that brings us to the point",
                    "说到重点",
                    0.05,
                    2.2,
                )],
                vocabulary: vec![],
            },
        );

    let mut config = quiet_config();
    config.reconcile.fuzzy_dedup = true;

    let job = TranscriptionJob::new(config, Arc::new(oracle))
        .with_decoder(Arc::new(MockDecoder::new().with_duration_seconds(400.0)))
        .with_encoder(Arc::new(MockEncoder::new()));

    let result = job.run(b"audio").await.unwrap();
    assert_eq!(result.transcript.len(), 1);
    assert!((result.transcript[0].start_time_in_seconds - 159.9).abs() < 1e-9);
}

#[tokio::test]
async fn decode_failure_aborts_without_completion() {
    let reporter = Arc::new(CollectingReporter::new());
    let job = TranscriptionJob::new(quiet_config(), Arc::new(ScriptedOracle::new()))
        .with_decoder(Arc::new(MockDecoder::new().with_failure()))
        .with_progress(reporter.clone());

    let result = job.run(b"not decodable").await;
    assert!(matches!(result, Err(LingscribeError::AudioDecode { .. })));
    assert!(
        reporter.percents().iter().all(|&p| p < 100),
        "onProgress must never reach 100 for a failed job"
    );
}

#[tokio::test]
async fn one_failing_chunk_of_three_keeps_the_rest() {
    let oracle = ScriptedOracle::new()
        .with_result(
            0,
            ChunkResult {
                transcript: vec![line("A", "first chunk text", "第一", 5.0, 7.0)],
                vocabulary: vec![word("first", "")],
            },
        )
        .with_failure(1, "oracle 500")
        .with_result(
            2,
            ChunkResult {
                transcript: vec![line("A", "third chunk text", "第三", 30.0, 32.0)],
                vocabulary: vec![word("third", "")],
            },
        );

    let result = job_with(oracle, 400.0).run(b"audio").await.unwrap();

    let texts: Vec<&str> = result
        .transcript
        .iter()
        .map(|l| l.english.as_str())
        .collect();
    assert_eq!(texts, vec!["first chunk text", "third chunk text"]);
    assert_eq!(result.transcript[1].start_time_in_seconds, 350.0);

    let words: Vec<&str> = result.vocabulary.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(words, vec!["first", "third"]);
}

#[tokio::test]
async fn progress_reports_start_completions_and_end() {
    let oracle = ScriptedOracle::new().with_default(ChunkResult::empty());
    let reporter = Arc::new(CollectingReporter::new());

    let job = job_with(oracle, 400.0).with_progress(reporter.clone());
    job.run(b"audio").await.unwrap();

    let events = reporter.events();
    assert!(events.len() >= 5, "start + 3 chunks + end, got {events:?}");
    assert_eq!(events[0].1, 0);
    assert_eq!(events.last().unwrap().1, 100);

    let percents = reporter.percents();
    assert!(
        percents.windows(2).all(|p| p[0] <= p[1]),
        "progress went backwards: {percents:?}"
    );
}
