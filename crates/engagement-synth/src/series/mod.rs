pub mod assemble;
pub mod ctr;
pub mod normalize;
pub mod partition;
pub mod records;
pub mod weights;

pub use assemble::SeriesAssembler;
pub use ctr::{realized_ctr, ImpressionCtrDeriver};
pub use normalize::normalize;
pub use partition::partition;
pub use records::{DailyMetricRecord, GeneratedSeries, ItemTotals, SeriesSummary};
pub use weights::{WeightProfileGenerator, WeightVector};
