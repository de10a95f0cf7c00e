use rand::Rng;

use crate::config::{
    band_for, GeneratorConfig, ViewWeightConfig, WatchtimeWeightConfig, MAX_WINDOW_LENGTH,
};
use crate::error::{SynthError, SynthResult};

// Floor for perturbed weights so a vector can always be normalized.
pub const MIN_WEIGHT: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(weights: Vec<f64>) -> Self {
        Self(weights)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct WeightProfileGenerator<'a> {
    views: &'a ViewWeightConfig,
    watchtime: &'a WatchtimeWeightConfig,
}

impl<'a> WeightProfileGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> SynthResult<Self> {
        config.view_weights.validate()?;
        config.watchtime_weights.validate()?;
        Ok(Self {
            views: &config.view_weights,
            watchtime: &config.watchtime_weights,
        })
    }

    /// Unnormalized decay-with-spikes profile; every entry is at least
    /// [`MIN_WEIGHT`].
    pub fn generate<R: Rng + ?Sized>(
        &self,
        window_length: usize,
        rng: &mut R,
    ) -> SynthResult<WeightVector> {
        ensure_window(window_length)?;
        let mut weights = Vec::with_capacity(window_length);
        for day_index in 0..window_length {
            weights.push(self.view_weight(day_index, rng)?);
        }
        Ok(WeightVector::new(weights))
    }

    /// View weights plus watch-time weights that start from the same day's
    /// view weight, scaled by a correlation draw and rolled for their own
    /// spikes and dips.
    pub fn generate_paired<R: Rng + ?Sized>(
        &self,
        window_length: usize,
        rng: &mut R,
    ) -> SynthResult<(WeightVector, WeightVector)> {
        ensure_window(window_length)?;
        let mut views = Vec::with_capacity(window_length);
        let mut watchtime = Vec::with_capacity(window_length);
        for day_index in 0..window_length {
            let view_weight = self.view_weight(day_index, rng)?;
            views.push(view_weight);

            let mut weight = view_weight * self.watchtime.correlation.sample(rng);
            weight = self.watchtime.spike.apply(weight, rng);
            weight = self.watchtime.dip.apply(weight, rng);
            watchtime.push(weight.max(MIN_WEIGHT));
        }
        Ok((WeightVector::new(views), WeightVector::new(watchtime)))
    }

    fn view_weight<R: Rng + ?Sized>(&self, day_index: usize, rng: &mut R) -> SynthResult<f64> {
        let band = band_for(&self.views.bands, day_index)?;
        let mut weight = band.range.sample(rng);
        weight = self.views.spike.apply(weight, rng);
        weight = self.views.dip.apply(weight, rng);
        Ok(weight.max(MIN_WEIGHT))
    }
}

fn ensure_window(window_length: usize) -> SynthResult<()> {
    if window_length == 0 {
        return Err(SynthError::Precondition(
            "window length must be greater than zero".to_string(),
        ));
    }
    if window_length > MAX_WINDOW_LENGTH {
        return Err(SynthError::Precondition(format!(
            "window length {window_length} exceeds the maximum of {MAX_WINDOW_LENGTH} days"
        )));
    }
    Ok(())
}
