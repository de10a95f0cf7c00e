use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::series::{DailyMetricRecord, ItemTotals};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelRow {
    pub channel_id: Uuid,
    pub handle: String,
    pub channel_name: String,
    pub created_on: NaiveDate,
    pub total_views: u64,
    pub total_subs: u64,
    pub total_comments: u64,
    pub total_watchtime: u64,
    pub total_revenue: f64,
    pub image_link: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoRow {
    pub video_id: Uuid,
    pub channel_id: Uuid,
    pub title: String,
    pub views: u64,
    pub subs: u64,
    pub revenue: f64,
    pub comments: u64,
    pub watchtime: u64,
    pub created_on: NaiveDate,
}

impl VideoRow {
    pub fn totals(&self) -> ItemTotals {
        ItemTotals {
            total_views: self.views,
            total_watchtime: self.watchtime,
            start_day: self.created_on,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyMetricRow {
    pub video_id: Uuid,
    #[serde(flatten)]
    pub record: DailyMetricRecord,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub schema_version: u32,
    pub seed: Option<u64>,
    pub channel_handles: Vec<String>,
    pub videos_per_channel: usize,
    pub window_length: usize,
    pub channels: usize,
    pub videos: usize,
    pub metric_rows: usize,
    pub created_at: DateTime<Utc>,
    pub config_sha256: String,
    pub metrics_sha256: String,
}
