use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

pub const DEFAULT_WINDOW_LENGTH: usize = 30;
pub const MAX_WINDOW_LENGTH: usize = 3_660;
pub const DEFAULT_FALLBACK_IMPRESSION_MULTIPLIER: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: f64,
    pub max: f64,
}

impl UniformRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, field: &str) -> SynthResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SynthError::InvalidArgument(format!(
                "{field}: range bounds must be finite"
            )));
        }
        if self.min < 0.0 {
            return Err(SynthError::InvalidArgument(format!(
                "{field}: range min must not be negative (got {})",
                self.min
            )));
        }
        if self.min > self.max {
            return Err(SynthError::InvalidArgument(format!(
                "{field}: range min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Perturbation {
    pub probability: f64,
    pub factor: UniformRange,
}

impl Perturbation {
    pub const fn new(probability: f64, min_factor: f64, max_factor: f64) -> Self {
        Self {
            probability,
            factor: UniformRange::new(min_factor, max_factor),
        }
    }

    pub const fn disabled() -> Self {
        Self::new(0.0, 1.0, 1.0)
    }

    pub fn apply<R: Rng + ?Sized>(&self, value: f64, rng: &mut R) -> f64 {
        if rng.gen::<f64>() < self.probability {
            value * self.factor.sample(rng)
        } else {
            value
        }
    }

    fn validate(&self, field: &str) -> SynthResult<()> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(SynthError::InvalidArgument(format!(
                "{field}: probability must be within [0, 1] (got {})",
                self.probability
            )));
        }
        self.factor.validate(field)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayBand {
    pub from_day: usize,
    pub range: UniformRange,
}

impl DayBand {
    pub const fn new(from_day: usize, min: f64, max: f64) -> Self {
        Self {
            from_day,
            range: UniformRange::new(min, max),
        }
    }
}

pub fn band_for(bands: &[DayBand], day_index: usize) -> SynthResult<&DayBand> {
    bands
        .iter()
        .rev()
        .find(|band| band.from_day <= day_index)
        .ok_or_else(|| {
            SynthError::Precondition(format!("no day band covers day index {day_index}"))
        })
}

fn validate_bands(bands: &[DayBand], field: &str) -> SynthResult<()> {
    let Some(first) = bands.first() else {
        return Err(SynthError::InvalidArgument(format!(
            "{field}: at least one band is required"
        )));
    };
    if first.from_day != 0 {
        return Err(SynthError::InvalidArgument(format!(
            "{field}: first band must start at day 0 (got {})",
            first.from_day
        )));
    }
    for pair in bands.windows(2) {
        if pair[1].from_day <= pair[0].from_day {
            return Err(SynthError::InvalidArgument(format!(
                "{field}: band start days must be strictly increasing ({} then {})",
                pair[0].from_day, pair[1].from_day
            )));
        }
    }
    for band in bands {
        band.range
            .validate(&format!("{field}[from_day={}]", band.from_day))?;
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewWeightConfig {
    pub bands: Vec<DayBand>,
    pub spike: Perturbation,
    pub dip: Perturbation,
}

impl Default for ViewWeightConfig {
    fn default() -> Self {
        Self {
            bands: default_weight_bands(),
            spike: Perturbation::new(0.2, 1.5, 4.0),
            dip: Perturbation::new(0.15, 0.3, 0.7),
        }
    }
}

impl ViewWeightConfig {
    pub fn validate(&self) -> SynthResult<()> {
        validate_bands(&self.bands, "view_weights.bands")?;
        self.spike.validate("view_weights.spike")?;
        self.dip.validate("view_weights.dip")
    }
}

fn default_weight_bands() -> Vec<DayBand> {
    vec![
        DayBand::new(0, 0.1, 0.3),
        DayBand::new(1, 0.05, 0.2),
        DayBand::new(2, 0.03, 0.15),
        DayBand::new(3, 0.02, 0.1),
        DayBand::new(7, 0.01, 0.08),
        DayBand::new(14, 0.005, 0.05),
    ]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchtimeWeightConfig {
    pub correlation: UniformRange,
    pub spike: Perturbation,
    pub dip: Perturbation,
}

impl Default for WatchtimeWeightConfig {
    fn default() -> Self {
        Self {
            correlation: UniformRange::new(0.5, 1.5),
            spike: Perturbation::new(0.15, 1.5, 3.0),
            dip: Perturbation::new(0.15, 0.3, 0.8),
        }
    }
}

impl WatchtimeWeightConfig {
    pub fn validate(&self) -> SynthResult<()> {
        self.correlation
            .validate("watchtime_weights.correlation")?;
        self.spike.validate("watchtime_weights.spike")?;
        self.dip.validate("watchtime_weights.dip")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtrConfig {
    pub bands: Vec<DayBand>,
    pub swing: Perturbation,
    pub fallback_impression_multiplier: u64,
}

impl Default for CtrConfig {
    fn default() -> Self {
        Self {
            bands: vec![
                DayBand::new(0, 0.04, 0.12),
                DayBand::new(3, 0.03, 0.11),
                DayBand::new(7, 0.02, 0.1),
                DayBand::new(14, 0.02, 0.08),
            ],
            swing: Perturbation::new(0.3, 0.5, 2.0),
            fallback_impression_multiplier: DEFAULT_FALLBACK_IMPRESSION_MULTIPLIER,
        }
    }
}

impl CtrConfig {
    pub fn validate(&self) -> SynthResult<()> {
        validate_bands(&self.bands, "ctr.bands")?;
        if let Some(band) = self.bands.iter().find(|band| band.range.max > 1.0) {
            return Err(SynthError::InvalidArgument(format!(
                "ctr.bands[from_day={}]: click-through rate must not exceed 1 (got {})",
                band.from_day, band.range.max
            )));
        }
        self.swing.validate("ctr.swing")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub window_length: usize,
    pub view_weights: ViewWeightConfig,
    pub watchtime_weights: WatchtimeWeightConfig,
    pub ctr: CtrConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            view_weights: ViewWeightConfig::default(),
            watchtime_weights: WatchtimeWeightConfig::default(),
            ctr: CtrConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Plain front-loaded decay: same bands, no spikes or dips, watch-time
    /// tracking views closely.
    pub fn steady() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            view_weights: ViewWeightConfig {
                bands: default_weight_bands(),
                spike: Perturbation::disabled(),
                dip: Perturbation::disabled(),
            },
            watchtime_weights: WatchtimeWeightConfig {
                correlation: UniformRange::new(0.9, 1.1),
                spike: Perturbation::disabled(),
                dip: Perturbation::disabled(),
            },
            ctr: CtrConfig {
                swing: Perturbation::disabled(),
                ..CtrConfig::default()
            },
        }
    }

    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    pub fn validate(&self) -> SynthResult<()> {
        validate_window_length(self.window_length)?;
        self.view_weights.validate()?;
        self.watchtime_weights.validate()?;
        self.ctr.validate()
    }
}

pub fn validate_window_length(window_length: usize) -> SynthResult<()> {
    if window_length == 0 {
        return Err(SynthError::InvalidArgument(
            "window_length must be greater than zero".to_string(),
        ));
    }
    if window_length > MAX_WINDOW_LENGTH {
        return Err(SynthError::InvalidArgument(format!(
            "window_length {window_length} exceeds the maximum of {MAX_WINDOW_LENGTH} days"
        )));
    }
    Ok(())
}

pub fn load_config(path: impl AsRef<Path>) -> SynthResult<GeneratorConfig> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let config = serde_yaml::from_slice::<GeneratorConfig>(&bytes).map_err(|error| {
        SynthError::InvalidArgument(format!("invalid config '{}': {error}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}
