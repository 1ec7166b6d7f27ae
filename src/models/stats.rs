//! Ownership statistics per investor and across the herd

/// Animal counts owned by one investor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipStats {
    /// Investor the counts belong to
    pub investor_id: String,
    /// Number of buffaloes owned
    pub buffalo_count: usize,
    /// Number of distinct calves owned
    pub calf_count: usize,
    /// `buffalo_count + calf_count`
    pub total: usize,
    /// Distinguishes a known zero from "not yet computed"
    pub fetched: bool,
}

impl OwnershipStats {
    /// Entry for an investor whose counts have not been computed yet
    #[must_use]
    pub fn pending(investor_id: impl Into<String>) -> Self {
        Self {
            investor_id: investor_id.into(),
            buffalo_count: 0,
            calf_count: 0,
            total: 0,
            fetched: false,
        }
    }

    /// Entry for an investor known to own nothing
    #[must_use]
    pub fn zero(investor_id: impl Into<String>) -> Self {
        Self {
            fetched: true,
            ..Self::pending(investor_id)
        }
    }

    /// Recompute `total` from the two tallies
    pub fn finalize(&mut self) {
        self.total = self.buffalo_count + self.calf_count;
    }

    /// Table cell for the total, `…` while loading
    #[must_use]
    pub fn total_label(&self) -> String {
        if self.fetched {
            self.total.to_string()
        } else {
            "…".to_string()
        }
    }
}

/// Sums across every investor for one aggregation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalTotals {
    /// `total_buffaloes + total_calves`
    pub total_animals: usize,
    /// Buffaloes counted
    pub total_buffaloes: usize,
    /// Distinct calves counted
    pub total_calves: usize,
}

/// Reconciliation findings from one aggregation pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregationDiagnostics {
    /// Records seen at the top level
    pub records_seen: usize,
    /// Classifiable animals with no resolvable owner (global totals only)
    pub unowned_animals: usize,
    /// Records that were neither buffalo nor calf
    pub unclassified_records: usize,
    /// Records whose identity had to be synthesized
    pub placeholder_identities: usize,
    /// Embedded calves skipped because their identity was already counted
    pub duplicate_calves_skipped: usize,
    /// Owner ids that are not among the scoped investors, sorted
    pub orphaned_owners: Vec<String>,
}
