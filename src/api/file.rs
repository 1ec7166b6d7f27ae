//! File-backed livestock API
//!
//! Serves the collaborator endpoints from JSON exports in one directory:
//! `animals.json`, `investors.json`, `farms.json`, `sheds.json` and
//! `employees.json`. Files may use any response shape the engine accepts.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;

use crate::common::traits::{ApiFuture, LivestockApi};
use crate::error::util::try_operations;
use crate::error::{HerdError, Result};
use crate::normalize::extract_records;
use crate::normalize::fields::{FARM_FIELDS, OWNER_FIELDS, PARENT_FIELDS, first_string};

const ANIMALS_FILE: &str = "animals.json";
const INVESTORS_FILE: &str = "investors.json";
const FARMS_FILE: &str = "farms.json";
const SHEDS_FILE: &str = "sheds.json";
const EMPLOYEES_FILE: &str = "employees.json";

/// Reads API payloads from a directory of JSON files
#[derive(Debug, Clone)]
pub struct JsonDirectoryApi {
    root: PathBuf,
}

impl JsonDirectoryApi {
    /// Serve files from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the files are read from
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_json(&self, file_name: &str) -> Result<Value> {
        let path = self.root.join(file_name);
        let text = fs::read_to_string(&path).await.map_err(|e| {
            HerdError::Io(io::Error::new(e.kind(), format!("{}: {e}", path.display())))
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Records of `file_name` whose `fields` value equals `wanted`
    async fn read_matching(&self, file_name: &str, fields: &[&str], wanted: &str) -> Result<Value> {
        let records = extract_records(self.read_json(file_name).await?)?;
        Ok(Value::Array(
            records
                .into_iter()
                .filter(|record| first_string(record, fields).as_deref() == Some(wanted))
                .collect(),
        ))
    }
}

/// Sheds of one farm from either a keyed object or a flat list
fn sheds_for_farm(payload: &Value, farm_id: &str) -> Result<Value> {
    let flat: Box<dyn FnOnce() -> Result<Value> + '_> = Box::new(|| {
        let records = extract_records(payload.clone())?;
        Ok(Value::Array(
            records
                .into_iter()
                .filter(|shed| first_string(shed, FARM_FIELDS).as_deref() == Some(farm_id))
                .collect(),
        ))
    });
    let keyed: Box<dyn FnOnce() -> Result<Value> + '_> = Box::new(|| {
        let by_farm = payload.as_object().ok_or_else(|| {
            HerdError::UnsupportedShape(
                "sheds file is neither a list nor keyed by farm".to_string(),
            )
        })?;
        match by_farm.get(farm_id) {
            Some(sheds) => Ok(Value::Array(extract_records(sheds.clone())?)),
            None => Ok(Value::Array(Vec::new())),
        }
    });

    try_operations(&format!("resolving sheds of farm {farm_id}"), vec![flat, keyed])
}

impl LivestockApi for JsonDirectoryApi {
    fn fetch_all_animals(&self) -> ApiFuture<'_> {
        Box::pin(self.read_json(ANIMALS_FILE))
    }

    fn fetch_animals_by_investor<'a>(&'a self, investor_id: &'a str) -> ApiFuture<'a> {
        Box::pin(self.read_matching(ANIMALS_FILE, OWNER_FIELDS, investor_id))
    }

    fn fetch_calves_by_tag<'a>(&'a self, rfid: &'a str) -> ApiFuture<'a> {
        Box::pin(self.read_matching(ANIMALS_FILE, PARENT_FIELDS, rfid))
    }

    fn fetch_all_farms(&self) -> ApiFuture<'_> {
        Box::pin(self.read_json(FARMS_FILE))
    }

    fn fetch_sheds_by_farm<'a>(&'a self, farm_id: &'a str) -> ApiFuture<'a> {
        Box::pin(async move {
            let payload = self.read_json(SHEDS_FILE).await?;
            sheds_for_farm(&payload, farm_id)
        })
    }

    fn fetch_all_employees(&self) -> ApiFuture<'_> {
        Box::pin(self.read_json(EMPLOYEES_FILE))
    }

    fn fetch_investors(&self) -> ApiFuture<'_> {
        Box::pin(self.read_json(INVESTORS_FILE))
    }
}
