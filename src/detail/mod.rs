//! Investor detail view: owned buffaloes, linked calves and resolved names

pub mod composer;
pub mod filter;
pub mod lookup;

pub use composer::InvestorDetailComposer;
pub use filter::{BuffaloGroup, RowContext, apply_filter, standalone_calves};
pub use lookup::{FarmLookup, ShedLookup, StaffLookup};
