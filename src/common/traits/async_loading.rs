//! Async data source traits
//!
//! The REST client is an external collaborator. The engine only sees it
//! through [`LivestockApi`], whose methods return raw JSON payloads in
//! whatever response shape the endpoint uses.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::Result;

/// Boxed future returned by data source methods
pub type ApiFuture<'a> = Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>>;

/// Endpoints consumed by aggregation and detail composition
pub trait LivestockApi: Send + Sync {
    /// Every animal record, in one response
    fn fetch_all_animals(&self) -> ApiFuture<'_>;

    /// Animals owned by one investor
    fn fetch_animals_by_investor<'a>(&'a self, investor_id: &'a str) -> ApiFuture<'a>;

    /// Calves linked to a buffalo by its RFID
    fn fetch_calves_by_tag<'a>(&'a self, rfid: &'a str) -> ApiFuture<'a>;

    /// Every farm
    fn fetch_all_farms(&self) -> ApiFuture<'_>;

    /// Sheds of one farm
    fn fetch_sheds_by_farm<'a>(&'a self, farm_id: &'a str) -> ApiFuture<'a>;

    /// Every employee
    fn fetch_all_employees(&self) -> ApiFuture<'_>;

    /// Every investor, for paging the investor table
    fn fetch_investors(&self) -> ApiFuture<'_>;
}
