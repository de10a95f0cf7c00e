use rand::Rng;

use crate::config::{band_for, CtrConfig};
use crate::error::SynthResult;

const CTR_SCALE: f64 = 10_000.0;

pub fn round_ctr(value: f64) -> f64 {
    (value * CTR_SCALE).round() / CTR_SCALE
}

pub fn realized_ctr(day_views: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    round_ctr(day_views as f64 / impressions as f64)
}

#[derive(Clone, Copy, Debug)]
pub struct ImpressionCtrDeriver<'a> {
    config: &'a CtrConfig,
}

impl<'a> ImpressionCtrDeriver<'a> {
    pub fn new(config: &'a CtrConfig) -> SynthResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn target_ctr<R: Rng + ?Sized>(&self, day_index: usize, rng: &mut R) -> SynthResult<f64> {
        let band = band_for(&self.config.bands, day_index)?;
        let target = self.config.swing.apply(band.range.sample(rng), rng);
        Ok(target.min(1.0))
    }

    /// Returns `(impressions, ctr)`; the stored ctr is recomputed from the
    /// integer pair, the target only shapes the impression count.
    pub fn derive<R: Rng + ?Sized>(
        &self,
        day_views: u64,
        day_index: usize,
        rng: &mut R,
    ) -> SynthResult<(u64, f64)> {
        let target = self.target_ctr(day_index, rng)?;
        let impressions = if target > 0.0 {
            (day_views as f64 / target).floor() as u64
        } else {
            day_views.saturating_mul(self.config.fallback_impression_multiplier)
        };
        Ok((impressions, realized_ctr(day_views, impressions)))
    }
}
