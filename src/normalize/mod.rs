//! Animal record normalization
//!
//! Turns heterogeneous raw records into [`NormalizedAnimal`]s. The
//! normalizer is pure: it never fails, and anything it cannot resolve is
//! left as `None` for the aggregator to skip.

pub mod fields;
pub mod shape;

pub use shape::{ResponseShape, detect_shape, extract_records};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::models::{AnimalKind, IdentitySource, NormalizedAnimal, RawAnimalRecord};
use fields::{
    CALF_FLAG_FIELDS, CHILDREN_FIELDS, FARM_FIELDS, ID_FIELDS, OWNER_FIELDS, PARENT_FIELDS,
    POSITION_FIELDS, RFID_FIELDS, SHED_FIELDS, TAG_FIELDS, TYPE_FIELDS, any_truthy, first_array,
    first_string,
};

/// Converts raw records to canonical animals
#[derive(Debug, Clone)]
pub struct Normalizer {
    placeholder_prefix: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new("__unidentified")
    }
}

impl Normalizer {
    /// Create a normalizer using the given placeholder prefix
    #[must_use]
    pub fn new(placeholder_prefix: impl Into<String>) -> Self {
        Self {
            placeholder_prefix: placeholder_prefix.into(),
        }
    }

    /// Normalize every top-level record, keeping input order
    #[must_use]
    pub fn normalize_all(&self, records: &[RawAnimalRecord]) -> Vec<NormalizedAnimal> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| self.normalize_record(record, index))
            .collect()
    }

    /// Normalize one top-level record found at `index` in its list
    #[must_use]
    pub fn normalize_record(&self, record: &RawAnimalRecord, index: usize) -> NormalizedAnimal {
        let placeholder = format!("{}-{index}", self.placeholder_prefix);
        let mut animal = base_animal(record, placeholder);
        animal.kind = classify(record);
        animal.embedded_calves = self.embedded_calves(record, &animal, &index.to_string());
        animal
    }

    /// Normalize the nested calf list of a parent record
    ///
    /// Children are calves by position, whatever their own discriminator
    /// says. They inherit the parent's owner and linkage when missing.
    fn embedded_calves(
        &self,
        record: &Value,
        parent: &NormalizedAnimal,
        parent_path: &str,
    ) -> Vec<NormalizedAnimal> {
        let Some(children) = first_array(record, CHILDREN_FIELDS) else {
            return Vec::new();
        };

        children
            .iter()
            .enumerate()
            .map(|(child_index, child)| {
                let path = format!("{parent_path}.{child_index}");
                let placeholder = format!("{}-{path}", self.placeholder_prefix);
                let mut calf = base_animal(child, placeholder);
                calf.kind = Some(AnimalKind::Calf);
                if calf.investor_id.is_none() {
                    calf.investor_id.clone_from(&parent.investor_id);
                }
                if calf.parent_id.is_none() {
                    calf.parent_id = Some(parent.id.clone());
                }
                calf
            })
            .collect()
    }
}

/// Resolve the identity, owner and location fields shared by all records
fn base_animal(record: &Value, placeholder: String) -> NormalizedAnimal {
    let explicit = first_string(record, ID_FIELDS);
    let rfid = first_string(record, RFID_FIELDS);
    let tag = first_string(record, TAG_FIELDS);

    let (id, identity_source) = match (explicit, &rfid, &tag) {
        (Some(id), _, _) => (id, IdentitySource::Explicit),
        (None, Some(rfid), _) => (rfid.clone(), IdentitySource::Rfid),
        (None, None, Some(tag)) => (tag.clone(), IdentitySource::Tag),
        (None, None, None) => (placeholder, IdentitySource::Placeholder),
    };

    NormalizedAnimal {
        id,
        identity_source,
        investor_id: first_string(record, OWNER_FIELDS),
        kind: None,
        rfid,
        tag,
        parent_id: first_string(record, PARENT_FIELDS),
        farm_id: first_string(record, FARM_FIELDS),
        shed_id: first_string(record, SHED_FIELDS),
        position: first_string(record, POSITION_FIELDS),
        embedded_calves: Vec::new(),
    }
}

/// Unwrap a list payload and deserialize each entry
///
/// Entries that do not deserialize are skipped and logged; one malformed
/// farm or employee does not hide the rest.
pub fn parse_list<T: DeserializeOwned>(payload: Value) -> Result<Vec<T>> {
    let records = extract_records(payload)?;
    let total = records.len();
    let parsed: Vec<T> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(e) => {
                log::debug!("Skipping malformed entry: {e}");
                None
            }
        })
        .collect();
    if parsed.len() < total {
        log::warn!("Skipped {} of {total} malformed entries", total - parsed.len());
    }
    Ok(parsed)
}

/// Classify a record as buffalo or calf
///
/// The calf flag wins over the discriminator; a discriminator containing
/// `CALF` also makes a calf.
#[must_use]
pub fn classify(record: &Value) -> Option<AnimalKind> {
    if any_truthy(record, CALF_FLAG_FIELDS) {
        return Some(AnimalKind::Calf);
    }
    first_string(record, TYPE_FIELDS).and_then(|t| AnimalKind::from_discriminator(&t))
}
