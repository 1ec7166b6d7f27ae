//! In-process caches for animal collections and ownership stats
//!
//! Both caches are plain values, constructed once and shared by reference,
//! so tests can build independent instances.

pub mod animals;
pub mod stats;

pub use animals::{AnimalCache, CachedAnimals};
pub use stats::OwnershipStatsCache;
