//! Common traits used across the codebase
//!
//! Defined here so that the API implementations, the cache and the
//! composers can depend on them without depending on each other.

pub mod async_loading;

pub use async_loading::{ApiFuture, LivestockApi};
