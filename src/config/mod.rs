//! Configuration for the ownership engine.

use std::fmt;

use crate::error::{HerdError, Result};

/// Scope token under which the full animal collection is cached
pub const ALL_ANIMALS_SCOPE: &str = "all-animals";

/// Configuration for aggregation, caching and investor detail composition
#[derive(Debug, Clone)]
pub struct OwnershipConfig {
    /// Cache key for the full animal collection
    pub scope_token: String,
    /// Maximum number of per-buffalo calf lookups in flight at once
    pub calf_fetch_concurrency: usize,
    /// Prefix for synthetic identities of records lacking id and RFID
    pub placeholder_prefix: String,
    /// Label shown when no employee holds a role on a farm
    pub unassigned_label: String,
    /// Label shown when a lookup has nothing to resolve
    pub missing_label: String,
    /// Investors per page of the investor table
    pub page_size: usize,
}

impl Default for OwnershipConfig {
    fn default() -> Self {
        Self {
            scope_token: ALL_ANIMALS_SCOPE.to_string(),
            calf_fetch_concurrency: num_cpus::get().max(1),
            placeholder_prefix: "__unidentified".to_string(),
            unassigned_label: "Not Assigned".to_string(),
            missing_label: "N/A".to_string(),
            page_size: 10,
        }
    }
}

impl OwnershipConfig {
    /// Build a configuration from `HERD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(token) = lookup("HERD_SCOPE_TOKEN") {
            let token = token.trim();
            if token.is_empty() {
                return Err(HerdError::Config("HERD_SCOPE_TOKEN is empty".to_string()));
            }
            config.scope_token = token.to_string();
        }
        if let Some(value) = lookup("HERD_CALF_FETCH_CONCURRENCY") {
            config.calf_fetch_concurrency = parse_positive("HERD_CALF_FETCH_CONCURRENCY", &value)?;
        }
        if let Some(value) = lookup("HERD_PAGE_SIZE") {
            config.page_size = parse_positive("HERD_PAGE_SIZE", &value)?;
        }

        Ok(config)
    }

    /// Set the calf lookup concurrency
    #[must_use]
    pub fn with_calf_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.calf_fetch_concurrency = concurrency.max(1);
        self
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(HerdError::Config(format!(
            "{key} must be a positive integer, got {value:?}"
        ))),
    }
}

impl fmt::Display for OwnershipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ownership Configuration:")?;
        writeln!(f, "  Scope Token: {}", self.scope_token)?;
        writeln!(f, "  Calf Fetch Concurrency: {}", self.calf_fetch_concurrency)?;
        writeln!(f, "  Page Size: {}", self.page_size)?;
        Ok(())
    }
}
