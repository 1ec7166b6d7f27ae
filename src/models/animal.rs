//! Animal records in raw and canonical form

use crate::models::types::{AnimalKind, IdentitySource};

/// Raw animal record as delivered by the API
///
/// Field names vary between endpoints, so records stay untyped JSON until
/// the normalizer has resolved them.
pub type RawAnimalRecord = serde_json::Value;

/// Canonical animal derived from one raw record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAnimal {
    /// Non-empty identifier (explicit id, RFID, tag, or placeholder)
    pub id: String,
    /// Where `id` came from
    pub identity_source: IdentitySource,
    /// Owning investor, if resolvable
    pub investor_id: Option<String>,
    /// Countable kind; `None` when the record could not be classified
    pub kind: Option<AnimalKind>,
    /// RFID tag number
    pub rfid: Option<String>,
    /// Secondary tag identifier
    pub tag: Option<String>,
    /// Identifier of the parent buffalo, for calves
    pub parent_id: Option<String>,
    /// Farm the animal is housed on
    pub farm_id: Option<String>,
    /// Shed within the farm
    pub shed_id: Option<String>,
    /// Parking position / slot inside the shed
    pub position: Option<String>,
    /// Calves nested inside this record
    pub embedded_calves: Vec<NormalizedAnimal>,
}

impl NormalizedAnimal {
    /// Identity used to decide whether a calf was already counted
    ///
    /// First non-empty of id, RFID and tag. Placeholder ids are returned
    /// as-is; they are unique per position and never collide.
    #[must_use]
    pub fn dedup_identity(&self) -> &str {
        match self.identity_source {
            IdentitySource::Explicit | IdentitySource::Placeholder => &self.id,
            IdentitySource::Rfid | IdentitySource::Tag => self
                .rfid
                .as_deref()
                .or(self.tag.as_deref())
                .unwrap_or(&self.id),
        }
    }

    /// Whether the record is a buffalo
    #[must_use]
    pub fn is_buffalo(&self) -> bool {
        self.kind == Some(AnimalKind::Buffalo)
    }

    /// Whether the record is a calf
    #[must_use]
    pub fn is_calf(&self) -> bool {
        self.kind == Some(AnimalKind::Calf)
    }

    /// Kind label for tables, `UNKNOWN` for unclassified records
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        self.kind.map_or("UNKNOWN", AnimalKind::label)
    }

    /// RFID, then tag: the handle used to look up linked calves
    #[must_use]
    pub fn lookup_tag(&self) -> Option<&str> {
        self.rfid.as_deref().or(self.tag.as_deref())
    }
}
