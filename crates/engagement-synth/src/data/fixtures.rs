use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use super::datasets::{ChannelRow, DailyMetricRow, DatasetManifest, VideoRow};
use super::generator::{generate_channels, generate_videos, round_cents};
use crate::config::GeneratorConfig;
use crate::error::{SynthError, SynthResult};
use crate::series::{GeneratedSeries, SeriesAssembler};

pub const SCHEMA_VERSION: u32 = 1;
const CHANNELS_FILE: &str = "channels.jsonl";
const VIDEOS_FILE: &str = "videos.jsonl";
const METRICS_FILE: &str = "daily_metrics.jsonl";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DatasetRequest {
    pub seed: Option<u64>,
    pub channel_handles: Vec<String>,
    pub videos_per_channel: usize,
    pub today: NaiveDate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedVideo {
    pub video_id: Uuid,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub channels: Vec<ChannelRow>,
    pub videos: Vec<VideoRow>,
    pub metrics: Vec<DailyMetricRow>,
    pub skipped: Vec<SkippedVideo>,
}

/// Runs the assembler once per video. A video whose series cannot be built
/// is reported in the second list and does not stop its siblings.
pub fn attach_series<R: Rng + ?Sized>(
    videos: Vec<VideoRow>,
    assembler: &SeriesAssembler<'_>,
    rng: &mut R,
) -> (Vec<(VideoRow, GeneratedSeries)>, Vec<SkippedVideo>) {
    let mut built = Vec::with_capacity(videos.len());
    let mut skipped = Vec::new();
    for mut video in videos {
        match assembler.assemble(&video.totals(), rng) {
            Ok(series) => {
                video.views = series.summary.views;
                video.watchtime = series.summary.watchtime;
                built.push((video, series));
            }
            Err(e) => {
                warn!(video_id = %video.video_id, error = %e, "skipping video");
                skipped.push(SkippedVideo {
                    video_id: video.video_id,
                    reason: e.to_string(),
                });
            }
        }
    }
    (built, skipped)
}

pub fn generate_dataset<R: Rng + ?Sized>(
    request: &DatasetRequest,
    config: &GeneratorConfig,
    rng: &mut R,
) -> SynthResult<Dataset> {
    let assembler = SeriesAssembler::new(config)?;

    let mut channels = generate_channels(rng, &request.channel_handles, request.today);
    let mut videos = Vec::new();
    let mut metrics = Vec::new();
    let mut skipped = Vec::new();

    for channel in &mut channels {
        let generated = generate_videos(
            rng,
            channel.channel_id,
            request.videos_per_channel,
            request.today,
        )?;
        let (built, channel_skipped) = attach_series(generated, &assembler, rng);
        skipped.extend(channel_skipped);

        for (video, series) in built {
            channel.total_views += video.views;
            channel.total_comments += video.comments;
            channel.total_watchtime += video.watchtime;
            channel.total_revenue += video.revenue;

            metrics.extend(series.records.into_iter().map(|record| DailyMetricRow {
                video_id: video.video_id,
                record,
            }));
            videos.push(video);
        }
        channel.total_revenue = round_cents(channel.total_revenue);
    }

    Ok(Dataset {
        channels,
        videos,
        metrics,
        skipped,
    })
}

pub fn generate_fixtures<R: Rng + ?Sized>(
    out_dir: &Path,
    request: &DatasetRequest,
    config: &GeneratorConfig,
    force: bool,
    rng: &mut R,
) -> SynthResult<DatasetManifest> {
    let config_sha256 = sha256_hex(&serde_json::to_vec(config)?);

    if out_dir.exists() {
        match load_manifest(out_dir) {
            Ok(existing) => {
                let matches_request = existing.schema_version == SCHEMA_VERSION
                    && request.seed.is_some()
                    && existing.seed == request.seed
                    && existing.channel_handles == request.channel_handles
                    && existing.videos_per_channel == request.videos_per_channel
                    && existing.config_sha256 == config_sha256;
                if !force && matches_request {
                    if store_is_intact(out_dir, &existing) {
                        info!(out_dir = %out_dir.display(), "existing dataset matches request; keeping it");
                        return Ok(existing);
                    }
                    warn!(out_dir = %out_dir.display(), "existing dataset files do not match its manifest; regenerating");
                }
            }
            // Only a directory this tool wrote (it has a manifest) is replaced implicitly.
            Err(_) => {
                if !force && !is_empty_dir(out_dir)? {
                    return Err(SynthError::InvalidArgument(format!(
                        "'{}' exists and is not a dataset store (no {MANIFEST_FILE}); pass --force to replace it or choose another --out-dir",
                        out_dir.display()
                    )));
                }
            }
        }
    }

    let dataset = generate_dataset(request, config, rng)?;

    let staging = staging_dir(out_dir)?;
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    fs::write(staging.join(CHANNELS_FILE), rows_jsonl(&dataset.channels)?)?;
    fs::write(staging.join(VIDEOS_FILE), rows_jsonl(&dataset.videos)?)?;
    let metrics_bytes = rows_jsonl(&dataset.metrics)?;
    fs::write(staging.join(METRICS_FILE), &metrics_bytes)?;

    let manifest = DatasetManifest {
        schema_version: SCHEMA_VERSION,
        seed: request.seed,
        channel_handles: request.channel_handles.clone(),
        videos_per_channel: request.videos_per_channel,
        window_length: config.window_length,
        channels: dataset.channels.len(),
        videos: dataset.videos.len(),
        metric_rows: dataset.metrics.len(),
        created_at: Utc::now(),
        config_sha256,
        metrics_sha256: sha256_hex(&metrics_bytes),
    };
    fs::write(
        staging.join(MANIFEST_FILE),
        serde_json::to_vec_pretty(&manifest)?,
    )?;

    if out_dir.exists() {
        fs::remove_dir_all(out_dir)?;
    }
    fs::rename(&staging, out_dir)?;

    info!(
        out_dir = %out_dir.display(),
        channels = manifest.channels,
        videos = manifest.videos,
        metric_rows = manifest.metric_rows,
        skipped = dataset.skipped.len(),
        "wrote dataset"
    );
    Ok(manifest)
}

fn store_is_intact(out_dir: &Path, manifest: &DatasetManifest) -> bool {
    if !out_dir.join(CHANNELS_FILE).is_file() || !out_dir.join(VIDEOS_FILE).is_file() {
        return false;
    }
    fs::read(out_dir.join(METRICS_FILE))
        .map(|bytes| sha256_hex(&bytes) == manifest.metrics_sha256)
        .unwrap_or(false)
}

fn is_empty_dir(path: &Path) -> SynthResult<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

fn staging_dir(out_dir: &Path) -> SynthResult<PathBuf> {
    let name = out_dir.file_name().ok_or_else(|| {
        SynthError::InvalidArgument(format!(
            "output directory '{}' has no final path component",
            out_dir.display()
        ))
    })?;
    let mut staging_name = std::ffi::OsString::from(".");
    staging_name.push(name);
    staging_name.push(".staging");
    Ok(out_dir.with_file_name(staging_name))
}

fn rows_jsonl<T: Serialize>(rows: &[T]) -> SynthResult<Vec<u8>> {
    let mut out = Vec::new();
    for row in rows {
        serde_json::to_writer(&mut out, row)?;
        out.push(b'\n');
    }
    Ok(out)
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn load_jsonl<T: DeserializeOwned>(path: &Path) -> SynthResult<Vec<T>> {
    let data = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    for line in data.lines() {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(serde_json::from_str(line)?);
    }
    Ok(rows)
}

pub fn load_channels(out_dir: &Path) -> SynthResult<Vec<ChannelRow>> {
    load_jsonl(&out_dir.join(CHANNELS_FILE))
}

pub fn load_videos(out_dir: &Path) -> SynthResult<Vec<VideoRow>> {
    load_jsonl(&out_dir.join(VIDEOS_FILE))
}

pub fn load_daily_metrics(out_dir: &Path) -> SynthResult<Vec<DailyMetricRow>> {
    load_jsonl(&out_dir.join(METRICS_FILE))
}

/// Metric rows grouped by video, each group ordered by day.
pub fn load_metrics_by_video(out_dir: &Path) -> SynthResult<HashMap<Uuid, Vec<DailyMetricRow>>> {
    let mut grouped: HashMap<Uuid, Vec<DailyMetricRow>> = HashMap::new();
    for row in load_daily_metrics(out_dir)? {
        grouped.entry(row.video_id).or_default().push(row);
    }
    for rows in grouped.values_mut() {
        rows.sort_by_key(|row| row.record.day);
    }
    Ok(grouped)
}

pub fn load_manifest(out_dir: &Path) -> SynthResult<DatasetManifest> {
    let path = out_dir.join(MANIFEST_FILE);
    let manifest: DatasetManifest = serde_json::from_slice(&fs::read(path)?)?;
    Ok(manifest)
}
