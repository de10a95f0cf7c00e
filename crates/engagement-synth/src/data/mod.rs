pub mod datasets;
pub mod fixtures;
pub mod generator;
