//! Common domain type definitions
//!
//! Closed enums used across animal records, lookups and display filters.
//! Free-text values from the API are parsed into these once, at the edge.

use std::fmt;

/// Countable kind of an animal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimalKind {
    /// Adult buffalo
    Buffalo,
    /// Calf, possibly linked to a parent buffalo
    Calf,
}

impl AnimalKind {
    /// Classify a type discriminator string
    ///
    /// Any value containing `CALF` is a calf; `BUFFALO` and `ADULT` are
    /// buffaloes. Comparison is case-insensitive.
    #[must_use]
    pub fn from_discriminator(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        if upper.contains("CALF") {
            Some(Self::Calf)
        } else if upper == "BUFFALO" || upper == "ADULT" {
            Some(Self::Buffalo)
        } else {
            None
        }
    }

    /// Uppercase label used in tables
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Buffalo => "BUFFALO",
            Self::Calf => "CALF",
        }
    }
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a normalized animal's identifier came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentitySource {
    /// An explicit id field
    Explicit,
    /// The RFID field
    Rfid,
    /// The tag field
    Tag,
    /// Synthesized from the record's position in its list
    Placeholder,
}

impl IdentitySource {
    /// Whether the identity is stable across fetches of the same dataset
    #[must_use]
    pub const fn is_stable(self) -> bool {
        !matches!(self, Self::Placeholder)
    }
}

/// Row filter of the investor detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayFilter {
    /// Buffaloes with nested calves, then standalone calves
    #[default]
    All,
    /// Buffaloes with nested calves
    Buffalo,
    /// Every calf flattened into its own row
    Calf,
}

impl From<&str> for DisplayFilter {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "BUFFALO" | "BUFFALOES" | "ADULT" => Self::Buffalo,
            "CALF" | "CALVES" => Self::Calf,
            _ => Self::All,
        }
    }
}

/// Employee role relevant to animal care
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmployeeRole {
    /// Veterinary doctor assigned to a farm
    Doctor,
    /// Farm manager
    Manager,
    /// Any other role, lowercased
    Other(String),
}

impl From<&str> for EmployeeRole {
    fn from(s: &str) -> Self {
        let lower = s.trim().to_lowercase().replace([' ', '-'], "_");
        match lower.as_str() {
            "doctor" | "vet" | "veterinarian" | "veterinary_doctor" => Self::Doctor,
            "manager" | "farm_manager" | "farmmanager" => Self::Manager,
            _ => Self::Other(lower),
        }
    }
}
