//! Field candidates and value extractors for raw animal records
//!
//! Each logical field lists the names it is known to appear under, in
//! priority order. A dotted name (`farm.id`) reaches into a nested object.

use serde_json::Value;

/// Explicit identifier
pub const ID_FIELDS: &[&str] = &["id", "_id", "animal_id", "animalId", "buffalo_id", "calf_id"];
/// RFID tag number
pub const RFID_FIELDS: &[&str] = &["rfid_tag_number", "rfid_tag", "rfid", "rfidTag"];
/// Secondary tag
pub const TAG_FIELDS: &[&str] = &["tag_id", "tagId", "ear_tag", "tag"];
/// Owning investor
pub const OWNER_FIELDS: &[&str] = &[
    "investor_id",
    "investorId",
    "user_id",
    "userId",
    "owner_id",
    "ownerId",
    "investor.id",
];
/// Type discriminator
pub const TYPE_FIELDS: &[&str] = &["animal_type", "animalType", "type", "category", "kind"];
/// Boolean-ish calf flag
pub const CALF_FLAG_FIELDS: &[&str] = &["is_calf", "isCalf"];
/// Nested calf list
pub const CHILDREN_FIELDS: &[&str] = &["calves", "children", "child_calves", "embedded_calves"];
/// Parent buffalo linkage
pub const PARENT_FIELDS: &[&str] = &[
    "parent_animal_id",
    "parentId",
    "parent_id",
    "parent_rfid",
    "mother_id",
];
/// Farm reference
pub const FARM_FIELDS: &[&str] = &["farm_id", "farmId", "farm.id"];
/// Shed reference
pub const SHED_FIELDS: &[&str] = &["shed_id", "shedId", "shed.id"];
/// Position inside the shed
pub const POSITION_FIELDS: &[&str] = &["parking_position", "position", "row_number", "slot"];

/// Look up a possibly dotted field name
fn lookup<'a>(record: &'a Value, name: &str) -> Option<&'a Value> {
    name.split('.').try_fold(record, |value, key| value.get(key))
}

/// Render a scalar as a trimmed, non-empty string
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-empty string value among the candidates
#[must_use]
pub fn first_string(record: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|name| lookup(record, name))
        .find_map(scalar_to_string)
}

/// Whether any candidate holds a truthy flag
///
/// Truthy means `true`, a non-zero number, or one of `true`, `1`, `yes`, `y`
/// in any case.
#[must_use]
pub fn any_truthy(record: &Value, candidates: &[&str]) -> bool {
    candidates
        .iter()
        .filter_map(|name| lookup(record, name))
        .any(|value| match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "true" | "1" | "yes" | "y"
            ),
            _ => false,
        })
}

/// First candidate holding an array
#[must_use]
pub fn first_array<'a>(record: &'a Value, candidates: &[&str]) -> Option<&'a Vec<Value>> {
    candidates
        .iter()
        .filter_map(|name| lookup(record, name))
        .find_map(Value::as_array)
}
