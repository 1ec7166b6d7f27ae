//! Denormalized investor detail view

use crate::models::directory::Investor;
use crate::models::types::DisplayFilter;

/// One animal row with resolved farm, shed and staff names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalRow {
    /// Animal identifier
    pub id: String,
    /// RFID tag, if any
    pub rfid: Option<String>,
    /// `BUFFALO`, `CALF` or `UNKNOWN`
    pub kind: &'static str,
    /// Parent buffalo for calf rows
    pub parent_id: Option<String>,
    /// Farm identifier
    pub farm_id: Option<String>,
    /// Resolved farm name
    pub farm_name: String,
    /// Shed identifier
    pub shed_id: Option<String>,
    /// Resolved shed name
    pub shed_name: String,
    /// Parking position inside the shed
    pub position: String,
    /// Doctor assigned to the farm
    pub doctor_name: String,
    /// Manager assigned to the farm
    pub manager_name: String,
    /// Calves linked to this buffalo; empty for calf rows
    pub linked_calves: Vec<AnimalRow>,
}

impl AnimalRow {
    /// Number of rows including nested calves
    #[must_use]
    pub fn row_count(&self) -> usize {
        1 + self.linked_calves.len()
    }
}

/// Investor joined with owned animals, assembled fresh per visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestorDetailView {
    /// The investor being viewed
    pub investor: Investor,
    /// Filter that shaped `rows`
    pub filter: DisplayFilter,
    /// Table rows
    pub rows: Vec<AnimalRow>,
    /// Buffaloes owned
    pub buffalo_count: usize,
    /// Distinct calves owned, nested or standalone
    pub calf_count: usize,
    /// Sub-fetches that failed and were replaced by fallbacks
    pub degraded: Vec<String>,
}

impl InvestorDetailView {
    /// Whether every sub-fetch succeeded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }
}
