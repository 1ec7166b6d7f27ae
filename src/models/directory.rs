//! Investors, farms, sheds and employees as returned by the API
//!
//! Ids arrive as numbers or strings depending on the endpoint; they are
//! stored as strings so lookups compare like with like.

use serde::{Deserialize, Deserializer};

use crate::models::types::EmployeeRole;

/// Deserialize a number or string into a trimmed string
pub fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s.trim().to_string()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

fn optional_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Account that owns animals
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Investor {
    /// Investor identifier
    #[serde(deserialize_with = "string_or_number", alias = "_id", alias = "investor_id")]
    pub id: String,
    /// Display name
    #[serde(default, alias = "full_name", alias = "fullName")]
    pub name: Option<String>,
}

impl Investor {
    /// Investor with only an id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Farm housing animals
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Farm {
    /// Farm identifier
    #[serde(deserialize_with = "string_or_number", alias = "_id", alias = "farm_id")]
    pub id: String,
    /// Farm name
    #[serde(default, alias = "farm_name", alias = "farmName")]
    pub name: Option<String>,
    /// Farm location
    #[serde(default)]
    pub location: Option<String>,
}

/// Shed within a farm
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Shed {
    /// Shed identifier
    #[serde(deserialize_with = "string_or_number", alias = "_id", alias = "shed_id")]
    pub id: String,
    /// Shed name
    #[serde(default, alias = "shed_name", alias = "shedName")]
    pub name: Option<String>,
    /// Farm the shed belongs to, when the payload says so
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        alias = "farmId"
    )]
    pub farm_id: Option<String>,
}

/// Role value that may be a single string or a list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum RoleField {
    One(String),
    Many(Vec<String>),
}

/// Farm employee
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Employee {
    /// Employee identifier
    #[serde(deserialize_with = "string_or_number", alias = "_id")]
    pub id: String,
    /// Given name
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    role: Option<RoleField>,
    #[serde(default)]
    roles: Option<RoleField>,
    /// Farm the employee works on
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        alias = "farmId"
    )]
    pub farm_id: Option<String>,
}

impl Employee {
    /// All roles from both `role` and `roles`
    #[must_use]
    pub fn roles(&self) -> Vec<EmployeeRole> {
        [&self.role, &self.roles]
            .into_iter()
            .flatten()
            .flat_map(|field| match field {
                RoleField::One(s) => vec![s.as_str()],
                RoleField::Many(v) => v.iter().map(String::as_str).collect(),
            })
            .map(EmployeeRole::from)
            .collect()
    }

    /// Whether the employee holds the role
    #[must_use]
    pub fn has_role(&self, role: &EmployeeRole) -> bool {
        self.roles().iter().any(|r| r == role)
    }

    /// `first last`, skipping missing parts
    #[must_use]
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
