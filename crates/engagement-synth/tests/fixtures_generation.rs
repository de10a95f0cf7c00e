use std::collections::HashMap;

use chrono::NaiveDate;
use engagement_synth::config::GeneratorConfig;
use engagement_synth::data::fixtures::{
    attach_series, generate_dataset, generate_fixtures, load_channels, load_daily_metrics,
    load_manifest, load_metrics_by_video, load_videos, DatasetRequest,
};
use engagement_synth::data::generator::generate_videos;
use engagement_synth::series::SeriesAssembler;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

fn request(seed: u64) -> DatasetRequest {
    DatasetRequest {
        seed: Some(seed),
        channel_handles: vec!["umer".to_string(), "Danny".to_string()],
        videos_per_channel: 3,
        today: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
    }
}

#[test]
fn dataset_rows_roll_up_to_their_owners() {
    let config = GeneratorConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let dataset = generate_dataset(&request(42), &config, &mut rng).expect("generate dataset");

    assert_eq!(dataset.channels.len(), 2);
    assert_eq!(dataset.videos.len(), 6);
    assert_eq!(dataset.metrics.len(), 6 * 30);
    assert!(dataset.skipped.is_empty());

    let mut views_by_video: HashMap<Uuid, u64> = HashMap::new();
    let mut watchtime_by_video: HashMap<Uuid, u64> = HashMap::new();
    for row in &dataset.metrics {
        *views_by_video.entry(row.video_id).or_default() += row.record.day_views;
        *watchtime_by_video.entry(row.video_id).or_default() += row.record.watchtime;
    }
    for video in &dataset.videos {
        assert_eq!(views_by_video[&video.video_id], video.views);
        assert_eq!(watchtime_by_video[&video.video_id], video.watchtime);
        assert!((1_000..=2_000_000).contains(&video.views));
    }
    for channel in &dataset.channels {
        let owned: Vec<_> = dataset
            .videos
            .iter()
            .filter(|v| v.channel_id == channel.channel_id)
            .collect();
        assert_eq!(owned.len(), 3);
        assert_eq!(
            channel.total_views,
            owned.iter().map(|v| v.views).sum::<u64>()
        );
        assert_eq!(
            channel.total_comments,
            owned.iter().map(|v| v.comments).sum::<u64>()
        );
        assert_eq!(channel.channel_name, format!("{}'s Channel", channel.handle));
    }
}

#[test]
fn writes_and_reloads_the_store() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out_dir = temp.path().join("demo");
    let config = GeneratorConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let manifest = generate_fixtures(&out_dir, &request(42), &config, false, &mut rng)
        .expect("generate fixtures");
    assert_eq!(manifest.videos, 6);
    assert_eq!(manifest.metric_rows, 180);
    assert_eq!(manifest.window_length, 30);
    assert_eq!(manifest.metrics_sha256.len(), 64);

    assert_eq!(load_manifest(&out_dir).expect("manifest"), manifest);
    assert_eq!(load_channels(&out_dir).expect("channels").len(), 2);
    let videos = load_videos(&out_dir).expect("videos");
    assert_eq!(load_daily_metrics(&out_dir).expect("metrics").len(), 180);

    let grouped = load_metrics_by_video(&out_dir).expect("grouped metrics");
    for video in &videos {
        let rows = &grouped[&video.video_id];
        assert_eq!(rows.len(), 30);
        assert_eq!(rows[0].record.day, video.created_on);
        assert_eq!(
            rows.iter().map(|r| r.record.day_views).sum::<u64>(),
            video.views
        );
    }
    assert!(
        !temp.path().join(".demo.staging").exists(),
        "staging directory should be renamed into place"
    );
}

#[test]
fn keeps_matching_store_and_regenerates_on_seed_change() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out_dir = temp.path().join("demo");
    let config = GeneratorConfig::default();

    let first = generate_fixtures(
        &out_dir,
        &request(42),
        &config,
        false,
        &mut ChaCha8Rng::seed_from_u64(42),
    )
    .expect("generate seed 42");
    let again = generate_fixtures(
        &out_dir,
        &request(42),
        &config,
        false,
        &mut ChaCha8Rng::seed_from_u64(42),
    )
    .expect("reuse seed 42");
    assert_eq!(first.created_at, again.created_at);

    let second = generate_fixtures(
        &out_dir,
        &request(43),
        &config,
        false,
        &mut ChaCha8Rng::seed_from_u64(43),
    )
    .expect("regenerate seed 43");
    assert_eq!(second.seed, Some(43));
    assert_eq!(load_manifest(&out_dir).expect("manifest").seed, Some(43));
}

#[test]
fn failing_video_does_not_stop_its_siblings() {
    let config = GeneratorConfig::default();
    let assembler = SeriesAssembler::new(&config).expect("valid config");
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
    let mut videos =
        generate_videos(&mut rng, Uuid::nil(), 3, today).expect("generate videos");
    videos[1].views = u64::MAX;
    let broken_id = videos[1].video_id;

    let (built, skipped) = attach_series(videos, &assembler, &mut rng);
    assert_eq!(built.len(), 2);
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].video_id, broken_id);
    assert!(built.iter().all(|(video, series)| series.summary.views == video.views));
}

#[test]
fn video_titles_are_unique_within_a_channel() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
    let videos = generate_videos(&mut rng, Uuid::nil(), 50, today).expect("generate videos");
    let titles: std::collections::HashSet<_> = videos.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles.len(), 50);
    for video in &videos {
        let age = (today - video.created_on).num_days();
        assert!((1..=365).contains(&age), "unexpected age {age}");
    }
}

#[test]
fn refuses_to_replace_a_directory_that_is_not_a_store() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out_dir = temp.path().join("mydocs");
    std::fs::create_dir_all(&out_dir).expect("create dir");
    let thesis = out_dir.join("thesis.txt");
    std::fs::write(&thesis, "chapter one").expect("write file");
    let config = GeneratorConfig::default();

    let err = generate_fixtures(
        &out_dir,
        &request(42),
        &config,
        false,
        &mut ChaCha8Rng::seed_from_u64(42),
    )
    .expect_err("foreign directory should be left alone");
    assert!(
        err.to_string().contains("not a dataset store"),
        "unexpected error: {err}"
    );
    assert_eq!(
        std::fs::read_to_string(&thesis).expect("file survives"),
        "chapter one"
    );

    generate_fixtures(
        &out_dir,
        &request(42),
        &config,
        true,
        &mut ChaCha8Rng::seed_from_u64(42),
    )
    .expect("force replaces the directory");
    assert!(!thesis.exists());
    assert_eq!(load_daily_metrics(&out_dir).expect("metrics").len(), 180);
}

#[test]
fn empty_out_dir_is_filled_without_force() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out_dir = temp.path().join("empty");
    std::fs::create_dir_all(&out_dir).expect("create dir");

    generate_fixtures(
        &out_dir,
        &request(42),
        &GeneratorConfig::default(),
        false,
        &mut ChaCha8Rng::seed_from_u64(42),
    )
    .expect("empty directory can be filled");
    assert_eq!(load_videos(&out_dir).expect("videos").len(), 6);
}

#[test]
fn corrupted_metrics_force_regeneration() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out_dir = temp.path().join("demo");
    let config = GeneratorConfig::default();

    let first = generate_fixtures(
        &out_dir,
        &request(42),
        &config,
        false,
        &mut ChaCha8Rng::seed_from_u64(42),
    )
    .expect("generate seed 42");

    let metrics_path = out_dir.join("daily_metrics.jsonl");
    let contents = std::fs::read_to_string(&metrics_path).expect("read metrics");
    let truncated: String = contents.lines().take(10).map(|l| format!("{l}\n")).collect();
    std::fs::write(&metrics_path, truncated).expect("truncate metrics");

    let again = generate_fixtures(
        &out_dir,
        &request(42),
        &config,
        false,
        &mut ChaCha8Rng::seed_from_u64(42),
    )
    .expect("regenerate after corruption");
    assert_eq!(again.metrics_sha256, first.metrics_sha256);
    assert_eq!(load_daily_metrics(&out_dir).expect("metrics").len(), 180);
}
