use std::path::Path;

use chrono::Utc;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;
use uuid::Uuid;

use engagement_synth::cli::{
    parse_day, resolve_config, resolve_handles, validate_videos_per_channel, Args, Command,
};
use engagement_synth::config::GeneratorConfig;
use engagement_synth::data::fixtures::{
    generate_fixtures, load_manifest, load_metrics_by_video, load_videos, DatasetRequest,
};
use engagement_synth::error::{SynthError, SynthResult};
use engagement_synth::logging::init_logging;
use engagement_synth::series::{DailyMetricRecord, ItemTotals, SeriesAssembler, SeriesSummary};

fn main() -> SynthResult<()> {
    init_logging();
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref(), args.preset)?;
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    match args.command {
        Command::Data {
            channels,
            videos_per_channel,
            force,
        } => {
            validate_videos_per_channel(videos_per_channel)?;
            let request = DatasetRequest {
                seed: args.seed,
                channel_handles: resolve_handles(&channels)?,
                videos_per_channel,
                today: Utc::now().date_naive(),
            };
            let manifest = generate_fixtures(&args.out_dir, &request, &config, force, &mut rng)?;
            println!(
                "dataset ready at {} (channels={}, videos={}, metric_rows={})",
                args.out_dir.display(),
                manifest.channels,
                manifest.videos,
                manifest.metric_rows
            );
        }
        Command::Series {
            views,
            watchtime,
            start,
        } => {
            let start_day = match start.as_deref() {
                Some(value) => parse_day(value)?,
                None => Utc::now().date_naive(),
            };
            let totals = ItemTotals {
                total_views: views,
                total_watchtime: watchtime,
                start_day,
            };
            let series = SeriesAssembler::new(&config)?.assemble(&totals, &mut rng)?;
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        Command::Inspect { video } => {
            let filter = video
                .as_deref()
                .map(|id| {
                    Uuid::parse_str(id).map_err(|e| {
                        SynthError::InvalidArgument(format!("invalid video id '{id}': {e}"))
                    })
                })
                .transpose()?;
            inspect(&args.out_dir, filter)?;
        }
        Command::Doctor => doctor(&args.out_dir, args.config.as_deref(), &config)?,
    }

    Ok(())
}

fn inspect(out_dir: &Path, filter: Option<Uuid>) -> SynthResult<()> {
    let videos = load_videos(out_dir)?;
    let metrics = load_metrics_by_video(out_dir)?;

    let mut shown = 0usize;
    for video in videos
        .iter()
        .filter(|v| filter.map_or(true, |id| v.video_id == id))
    {
        let records: Vec<DailyMetricRecord> = metrics
            .get(&video.video_id)
            .map(|rows| rows.iter().map(|row| row.record.clone()).collect())
            .unwrap_or_default();
        let summary = SeriesSummary::from_records(&records);
        println!("{} ({})", video.title, video.video_id);
        println!(
            "  total_views={} series_views={} days={} impressions={} ctr={:.4}",
            video.views, summary.views, summary.days, summary.impressions, summary.ctr
        );
        match summary.peak_day {
            Some(day) => println!(
                "  peak={day} ({} views) launch_share={:.1}% half_views_after={} days",
                summary.peak_views,
                summary.launch_share * 100.0,
                summary
                    .days_to_half_views
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string())
            ),
            None => println!("  no daily rows"),
        }
        shown += 1;
    }

    if let (Some(id), 0) = (filter, shown) {
        return Err(SynthError::InvalidArgument(format!(
            "video '{id}' not found in {}",
            out_dir.display()
        )));
    }
    Ok(())
}

fn doctor(out_dir: &Path, config_path: Option<&Path>, config: &GeneratorConfig) -> SynthResult<()> {
    println!("engagement-synth doctor");
    println!("out_dir={}", out_dir.display());
    println!(
        "config_path={}",
        config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "preset".to_string())
    );
    match load_manifest(out_dir) {
        Ok(manifest) => {
            println!("dataset_present=true");
            println!(
                "dataset_seed={}",
                manifest
                    .seed
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
            println!("dataset_created_at={}", manifest.created_at.to_rfc3339());
        }
        Err(_) => println!("dataset_present=false"),
    }
    println!(
        "config={}",
        serde_json::to_string_pretty(&json!({ "generator": config }))?
    );
    Ok(())
}
