//! Animal ownership aggregation
//!
//! Per-investor buffalo and calf counts with calf deduplication across
//! top-level and embedded representations.

pub mod aggregator;
pub mod dedup;
pub mod statistics;

pub use aggregator::{
    AggregationOutcome, AggregationPass, OwnershipAggregator, aggregate_normalized,
};
pub use dedup::CalfDedupSet;
pub use statistics::OwnershipStatistics;
