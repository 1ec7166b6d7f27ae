//! A Rust library for counting livestock ownership per investor and
//! composing investor detail views from a livestock REST API.
//!
//! Raw animal records arrive in heterogeneous shapes. They are normalized,
//! aggregated into per-investor buffalo and calf counts with calves counted
//! once however many times they appear, and cached for the process lifetime.

pub mod algorithm;
pub mod api;
pub mod cache;
pub mod common;
pub mod config;
pub mod detail;
pub mod error;
pub mod models;
pub mod normalize;
pub mod ownership_manager;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::OwnershipConfig;
pub use error::{HerdError, Result};
pub use ownership_manager::OwnershipManager;

// Domain models
pub use models::{
    AggregationDiagnostics, AnimalKind, AnimalRow, DisplayFilter, GlobalTotals, Investor,
    InvestorDetailView, NormalizedAnimal, OwnershipStats, RawAnimalRecord,
};

// Aggregation and normalization
pub use algorithm::ownership::{AggregationOutcome, CalfDedupSet, OwnershipAggregator};
pub use normalize::{Normalizer, extract_records};

// Data sources
pub use api::JsonDirectoryApi;
pub use common::traits::{ApiFuture, LivestockApi};
