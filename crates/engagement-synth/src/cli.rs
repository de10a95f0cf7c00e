use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{load_config, GeneratorConfig};
use crate::data::generator::DEFAULT_CHANNEL_HANDLES;
use crate::error::{SynthError, SynthResult};

#[derive(Debug, Parser)]
#[command(
    name = "engagement-synth",
    about = "synthetic per-day engagement series for demo analytics stores"
)]
pub struct Args {
    #[arg(long, env = "SYNTH_OUT_DIR", default_value = "demo-data")]
    pub out_dir: PathBuf,
    #[arg(long, env = "SYNTH_CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long, env = "SYNTH_SEED")]
    pub seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = Preset::HighVariance)]
    pub preset: Preset,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    HighVariance,
    Steady,
}

impl Preset {
    pub fn config(self) -> GeneratorConfig {
        match self {
            Self::HighVariance => GeneratorConfig::default(),
            Self::Steady => GeneratorConfig::steady(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Data {
        #[arg(long = "channel")]
        channels: Vec<String>,
        #[arg(long, default_value_t = 5)]
        videos_per_channel: usize,
        #[arg(long)]
        force: bool,
    },
    Series {
        #[arg(long)]
        views: u64,
        #[arg(long)]
        watchtime: u64,
        #[arg(long)]
        start: Option<String>,
    },
    Inspect {
        #[arg(long)]
        video: Option<String>,
    },
    Doctor,
}

/// A file passed with `--config` replaces the preset entirely; fields it
/// leaves out take the high-variance defaults.
pub fn resolve_config(path: Option<&Path>, preset: Preset) -> SynthResult<GeneratorConfig> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => preset.config(),
    };
    config.validate()?;
    Ok(config)
}

pub const HANDLE_LENGTH: RangeInclusive<usize> = 3..=30;

/// Handles end up in channel names and image links, so they stay within
/// letters, digits, `.`, `-` and `_`, and start with a letter or digit.
pub fn validate_handle(handle: &str) -> SynthResult<()> {
    let length = handle.chars().count();
    if !HANDLE_LENGTH.contains(&length) {
        return Err(SynthError::InvalidArgument(format!(
            "channel handle '{handle}' must be {} to {} characters long (got {length})",
            HANDLE_LENGTH.start(),
            HANDLE_LENGTH.end()
        )));
    }
    if !handle.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(SynthError::InvalidArgument(format!(
            "channel handle '{handle}' must start with a letter or digit"
        )));
    }
    if let Some(bad) = handle
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(*c, '.' | '-' | '_'))
    {
        return Err(SynthError::InvalidArgument(format!(
            "channel handle '{handle}' contains '{bad}'; use letters, digits, '.', '-' or '_'"
        )));
    }
    Ok(())
}

pub fn resolve_handles(requested: &[String]) -> SynthResult<Vec<String>> {
    if requested.is_empty() {
        return Ok(DEFAULT_CHANNEL_HANDLES
            .iter()
            .map(|h| h.to_string())
            .collect());
    }
    // Handles are unique regardless of case: "Nemo" and "nemo" are one channel.
    let mut seen = HashSet::new();
    for handle in requested {
        validate_handle(handle)?;
        if !seen.insert(handle.to_ascii_lowercase()) {
            return Err(SynthError::InvalidArgument(format!(
                "channel handle '{handle}' given more than once"
            )));
        }
    }
    Ok(requested.to_vec())
}

pub fn parse_day(value: &str) -> SynthResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        SynthError::InvalidArgument(format!(
            "invalid date '{value}'; expected YYYY-MM-DD ({e})"
        ))
    })
}

pub fn validate_videos_per_channel(count: usize) -> SynthResult<()> {
    if count == 0 {
        return Err(SynthError::InvalidArgument(
            "videos-per-channel must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
