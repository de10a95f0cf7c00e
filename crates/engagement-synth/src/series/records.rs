use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ctr::{realized_ctr, round_ctr};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ItemTotals {
    pub total_views: u64,
    pub total_watchtime: u64,
    pub start_day: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyMetricRecord {
    pub record_id: Uuid,
    pub day: NaiveDate,
    pub day_views: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub watchtime: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub days: usize,
    pub views: u64,
    pub watchtime: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub peak_day: Option<NaiveDate>,
    pub peak_views: u64,
    pub launch_share: f64,
    pub days_to_half_views: Option<usize>,
}

impl SeriesSummary {
    pub fn from_records(records: &[DailyMetricRecord]) -> Self {
        let views: u64 = records.iter().map(|r| r.day_views).sum();
        let impressions = records.iter().map(|r| r.impressions).sum();

        // Ties go to the earlier day.
        let peak = records
            .iter()
            .fold(None::<&DailyMetricRecord>, |best, r| match best {
                Some(b) if b.day_views >= r.day_views => Some(b),
                _ => Some(r),
            });
        let launch_share = match (records.first(), views) {
            (Some(first), v) if v > 0 => round_ctr(first.day_views as f64 / v as f64),
            _ => 0.0,
        };

        Self {
            days: records.len(),
            views,
            watchtime: records.iter().map(|r| r.watchtime).sum(),
            impressions,
            ctr: realized_ctr(views, impressions),
            peak_day: peak.map(|r| r.day),
            peak_views: peak.map_or(0, |r| r.day_views),
            launch_share,
            days_to_half_views: days_to_half(records, views),
        }
    }
}

/// Number of leading days whose views reach at least half the total.
fn days_to_half(records: &[DailyMetricRecord], views: u64) -> Option<usize> {
    if views == 0 {
        return None;
    }
    let mut running = 0u64;
    records
        .iter()
        .position(|r| {
            running = running.saturating_add(r.day_views);
            running.saturating_mul(2) >= views
        })
        .map(|index| index + 1)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSeries {
    pub records: Vec<DailyMetricRecord>,
    pub summary: SeriesSummary,
}

impl GeneratedSeries {
    pub fn new(records: Vec<DailyMetricRecord>) -> Self {
        let summary = SeriesSummary::from_records(&records);
        Self { records, summary }
    }
}

/// UUIDv4 drawn from the caller's random source instead of the OS.
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}
