//! Per-investor ownership stats cache
//!
//! Investors appear as pending entries when a table page first shows them,
//! and all entries are swapped in at once when a full aggregation pass
//! commits. Readers never observe a half-applied pass.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::algorithm::ownership::AggregationOutcome;
use crate::error::{HerdError, Result};
use crate::models::{AggregationDiagnostics, GlobalTotals, OwnershipStats};

#[derive(Debug, Default)]
struct StatsState {
    entries: FxHashMap<String, OwnershipStats>,
    /// Investors registered by table pages; only `track` adds to it
    tracked: FxHashSet<String>,
    /// Full investor list owners are reconciled against, if known
    known: Option<FxHashSet<String>>,
    totals: GlobalTotals,
    diagnostics: AggregationDiagnostics,
    committed_at: Option<DateTime<Utc>>,
}

/// Ownership stats retained across investor table visits
#[derive(Debug, Default)]
pub struct OwnershipStatsCache {
    state: RwLock<StatsState>,
}

impl OwnershipStatsCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StatsState>> {
        self.state.read().map_err(|_| {
            HerdError::InvalidOperation("Failed to acquire read lock on stats cache".to_string())
        })
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StatsState>> {
        self.state.write().map_err(|_| {
            HerdError::InvalidOperation("Failed to acquire write lock on stats cache".to_string())
        })
    }

    /// Register investors shown on a page
    ///
    /// Unknown investors become pending, or known zero once a pass has
    /// committed, since a full pass covers every owner.
    pub fn track(&self, investor_ids: &[String]) -> Result<()> {
        let mut state = self.write()?;
        let committed = state.committed_at.is_some();
        for id in investor_ids {
            state.tracked.insert(id.clone());
            state.entries.entry(id.clone()).or_insert_with(|| {
                if committed {
                    OwnershipStats::zero(id.as_str())
                } else {
                    OwnershipStats::pending(id.as_str())
                }
            });
        }
        Ok(())
    }

    /// Investors tracked so far, sorted
    ///
    /// Owners that only appeared through a committed pass are not included.
    pub fn tracked_ids(&self) -> Result<Vec<String>> {
        Ok(self.read()?.tracked.iter().cloned().sorted().collect())
    }

    /// Record the full investor list
    pub fn set_known_investors(&self, investor_ids: &[String]) -> Result<()> {
        self.write()?.known = Some(investor_ids.iter().cloned().collect());
        Ok(())
    }

    /// The full investor list, sorted, if one was recorded
    pub fn known_ids(&self) -> Result<Option<Vec<String>>> {
        Ok(self
            .read()?
            .known
            .as_ref()
            .map(|known| known.iter().cloned().sorted().collect()))
    }

    /// Replace all entries with the result of a full pass
    pub fn commit(&self, outcome: &AggregationOutcome) -> Result<()> {
        let mut state = self.write()?;
        let mut entries = outcome.by_investor.clone();
        for id in &state.tracked {
            entries
                .entry(id.clone())
                .or_insert_with(|| OwnershipStats::zero(id.as_str()));
        }
        state.entries = entries;
        state.totals = outcome.totals;
        state.diagnostics = outcome.diagnostics.clone();
        state.committed_at = Some(Utc::now());
        Ok(())
    }

    /// Fetched stats for an investor, `None` until a pass has covered them
    pub fn get(&self, investor_id: &str) -> Result<Option<OwnershipStats>> {
        let state = self.read()?;
        Ok(match state.entries.get(investor_id) {
            Some(stats) if stats.fetched => Some(stats.clone()),
            Some(_) => None,
            None => state
                .committed_at
                .map(|_| OwnershipStats::zero(investor_id)),
        })
    }

    /// Stats for a page of investors, pending entries included
    pub fn page(&self, investor_ids: &[String]) -> Result<Vec<OwnershipStats>> {
        let state = self.read()?;
        Ok(investor_ids
            .iter()
            .map(|id| match state.entries.get(id) {
                Some(stats) => stats.clone(),
                None if state.committed_at.is_some() => OwnershipStats::zero(id.as_str()),
                None => OwnershipStats::pending(id.as_str()),
            })
            .collect())
    }

    /// The last committed pass as an outcome, pending entries left out
    pub fn snapshot(&self) -> Result<AggregationOutcome> {
        let state = self.read()?;
        Ok(AggregationOutcome {
            by_investor: state
                .entries
                .iter()
                .filter(|(_, stats)| stats.fetched)
                .map(|(id, stats)| (id.clone(), stats.clone()))
                .collect(),
            totals: state.totals,
            diagnostics: state.diagnostics.clone(),
        })
    }

    /// Global totals of the last committed pass
    pub fn totals(&self) -> Result<GlobalTotals> {
        Ok(self.read()?.totals)
    }

    /// Diagnostics of the last committed pass
    pub fn diagnostics(&self) -> Result<AggregationDiagnostics> {
        Ok(self.read()?.diagnostics.clone())
    }

    /// When the last pass committed
    pub fn committed_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read()?.committed_at)
    }

    /// Whether any pass has committed
    pub fn is_committed(&self) -> Result<bool> {
        Ok(self.committed_at()?.is_some())
    }

    /// Forget committed results; tracked investors go back to pending
    pub fn invalidate(&self) -> Result<()> {
        let mut state = self.write()?;
        state.entries = state
            .tracked
            .iter()
            .map(|id| (id.clone(), OwnershipStats::pending(id.as_str())))
            .collect();
        state.totals = GlobalTotals::default();
        state.diagnostics = AggregationDiagnostics::default();
        state.committed_at = None;
        Ok(())
    }
}
