use chrono::Days;
use rand::Rng;
use tracing::debug;

use super::ctr::ImpressionCtrDeriver;
use super::normalize::normalize;
use super::partition::partition;
use super::records::{random_uuid, DailyMetricRecord, GeneratedSeries, ItemTotals};
use super::weights::WeightProfileGenerator;
use crate::config::GeneratorConfig;
use crate::error::{SynthError, SynthResult};

#[derive(Clone, Copy, Debug)]
pub struct SeriesAssembler<'a> {
    window_length: usize,
    weights: WeightProfileGenerator<'a>,
    deriver: ImpressionCtrDeriver<'a>,
}

impl<'a> SeriesAssembler<'a> {
    pub fn new(config: &'a GeneratorConfig) -> SynthResult<Self> {
        config.validate()?;
        Ok(Self {
            window_length: config.window_length,
            weights: WeightProfileGenerator::new(config)?,
            deriver: ImpressionCtrDeriver::new(&config.ctr)?,
        })
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn assemble<R: Rng + ?Sized>(
        &self,
        totals: &ItemTotals,
        rng: &mut R,
    ) -> SynthResult<GeneratedSeries> {
        let window_length = self.window_length;
        let (view_weights, watchtime_weights) =
            self.weights.generate_paired(window_length, rng)?;

        let day_views = partition(&normalize(&view_weights)?, totals.total_views)?;
        let day_watchtime = partition(&normalize(&watchtime_weights)?, totals.total_watchtime)?;

        let mut records = Vec::with_capacity(window_length);
        for (day_index, (views, watchtime)) in day_views.into_iter().zip(day_watchtime).enumerate()
        {
            let day = totals
                .start_day
                .checked_add_days(Days::new(day_index as u64))
                .ok_or_else(|| {
                    SynthError::Precondition(format!(
                        "day {day_index} after {} is out of calendar range",
                        totals.start_day
                    ))
                })?;
            let (impressions, ctr) = self.deriver.derive(views, day_index, rng)?;
            records.push(DailyMetricRecord {
                record_id: random_uuid(rng),
                day,
                day_views: views,
                impressions,
                ctr,
                watchtime,
            });
        }

        let series = GeneratedSeries::new(records);
        debug!(
            start_day = %totals.start_day,
            window_length,
            views = series.summary.views,
            watchtime = series.summary.watchtime,
            impressions = series.summary.impressions,
            "assembled daily series"
        );
        Ok(series)
    }
}
