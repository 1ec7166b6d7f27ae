//! Data source implementations of [`LivestockApi`](crate::common::traits::LivestockApi)

pub mod file;

pub use file::JsonDirectoryApi;
