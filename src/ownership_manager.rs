//! Ownership Manager for the investor table and investor detail views
//!
//! Ties the animal cache, the aggregator and the stats cache together. The
//! full animal collection is fetched once per scope token and every page of
//! the investor table is served from one shared aggregation pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use log::{debug, error, info, warn};
use tokio::sync::Mutex;

use crate::algorithm::ownership::{OwnershipAggregator, OwnershipStatistics};
use crate::cache::{AnimalCache, OwnershipStatsCache};
use crate::common::traits::LivestockApi;
use crate::config::OwnershipConfig;
use crate::detail::InvestorDetailComposer;
use crate::error::Result;
use crate::error::util::recover_or_default;
use crate::models::{
    AggregationDiagnostics, DisplayFilter, GlobalTotals, Investor, InvestorDetailView,
    OwnershipStats,
};
use crate::normalize::{Normalizer, extract_records};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Manager for ownership counts and investor detail views
///
/// Safe to share between tasks; concurrent callers never trigger more than
/// one bulk fetch or aggregation pass at a time.
pub struct OwnershipManager {
    /// Data source
    api: Arc<dyn LivestockApi>,

    /// Labels, scope token and concurrency limits
    config: OwnershipConfig,

    /// Raw bulk responses per scope token
    animal_cache: AnimalCache,

    /// Per-investor counts of the last committed pass
    stats_cache: OwnershipStatsCache,

    aggregator: OwnershipAggregator,

    /// Serializes aggregation passes
    pass_lock: Mutex<()>,

    /// Number of committed passes
    passes: AtomicU64,
}

impl OwnershipManager {
    /// Create a manager over the given data source
    #[must_use]
    pub fn new(api: Arc<dyn LivestockApi>, config: OwnershipConfig) -> Self {
        let aggregator =
            OwnershipAggregator::new(Normalizer::new(config.placeholder_prefix.clone()));
        Self {
            api,
            config,
            animal_cache: AnimalCache::new(),
            stats_cache: OwnershipStatsCache::new(),
            aggregator,
            pass_lock: Mutex::new(()),
            passes: AtomicU64::new(0),
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &OwnershipConfig {
        &self.config
    }

    /// Record the full investor list
    ///
    /// Owners missing from it are reported in
    /// [`last_diagnostics`](Self::last_diagnostics) from the next pass on.
    /// Until it is set, owners are reconciled against the tracked pages.
    pub fn set_known_investors(&self, investor_ids: &[String]) -> Result<()> {
        self.stats_cache.set_known_investors(investor_ids)?;
        debug!("Reconciling owners against {} known investors", investor_ids.len());
        Ok(())
    }

    /// Stats for one page of the investor table
    ///
    /// Runs the shared aggregation pass if none has committed yet. Never
    /// fails: if the pass cannot run, the page comes back pending.
    pub async fn load_page(&self, investor_ids: &[String]) -> Vec<OwnershipStats> {
        if let Err(e) = self.stats_cache.track(investor_ids) {
            warn!("Could not track investors on page: {e}");
        }

        match self.stats_cache.is_committed() {
            Ok(true) => debug!("Serving {} investors from committed pass", investor_ids.len()),
            _ => {
                if let Err(e) = self.ensure_aggregated().await {
                    error!("Ownership aggregation failed, counts stay pending: {e}");
                }
            }
        }

        self.stats_cache.page(investor_ids).unwrap_or_else(|e| {
            warn!("Could not read stats cache: {e}");
            investor_ids
                .iter()
                .map(|id| OwnershipStats::pending(id.as_str()))
                .collect()
        })
    }

    /// Run an aggregation pass unless one has committed already
    async fn ensure_aggregated(&self) -> Result<()> {
        let _guard = self.pass_lock.lock().await;
        if self.stats_cache.is_committed()? {
            debug!("Joined aggregation pass committed while waiting");
            return Ok(());
        }
        self.run_pass().await
    }

    /// Recount from the cached collection
    ///
    /// Callers that queue up behind a running pass reuse its result instead
    /// of starting another one.
    pub async fn refresh(&self) -> Result<()> {
        let seen = self.passes.load(Ordering::SeqCst);
        let _guard = self.pass_lock.lock().await;
        if self.passes.load(Ordering::SeqCst) != seen {
            debug!("Refresh coalesced with a pass that finished while waiting");
            return Ok(());
        }
        self.run_pass().await
    }

    /// One full pass: fetch through the cache, aggregate, commit
    ///
    /// Must be called with `pass_lock` held.
    async fn run_pass(&self) -> Result<()> {
        let start = Instant::now();
        let scope = self.config.scope_token.as_str();
        log_operation_start("Aggregating ownership for scope", scope);

        let records = self
            .animal_cache
            .get_or_fetch(scope, move || async move {
                let payload = self.api.fetch_all_animals().await?;
                Ok(recover_or_default(
                    extract_records(payload),
                    "unwrapping bulk animal response",
                ))
            })
            .await?;

        let investor_ids = self.stats_cache.tracked_ids()?;
        let known_ids = self.stats_cache.known_ids()?;
        let outcome =
            self.aggregator
                .aggregate_reconciled(&records, &investor_ids, known_ids.as_deref());
        self.stats_cache.commit(&outcome)?;
        self.passes.fetch_add(1, Ordering::SeqCst);

        log_operation_complete("aggregated", scope, records.len(), Some(start.elapsed()));
        Ok(())
    }

    /// Drop cached records and counts; the next page load refetches
    pub fn invalidate(&self) -> Result<()> {
        self.animal_cache.invalidate(&self.config.scope_token)?;
        self.stats_cache.invalidate()?;
        info!("Invalidated ownership caches for scope {}", self.config.scope_token);
        Ok(())
    }

    /// Counts for one investor, `None` until a pass has covered them
    #[must_use]
    pub fn get_ownership_stats(&self, investor_id: &str) -> Option<OwnershipStats> {
        self.stats_cache.get(investor_id).unwrap_or_else(|e| {
            warn!("Could not read stats for investor {investor_id}: {e}");
            None
        })
    }

    /// Totals across the whole collection; zero before the first pass
    #[must_use]
    pub fn get_global_totals(&self) -> GlobalTotals {
        recover_or_default(self.stats_cache.totals(), "reading global totals")
    }

    /// Reconciliation findings of the last pass
    #[must_use]
    pub fn last_diagnostics(&self) -> AggregationDiagnostics {
        recover_or_default(self.stats_cache.diagnostics(), "reading diagnostics")
    }

    /// Text summary of the last pass
    pub fn summary(&self, top: usize) -> Result<String> {
        let outcome = self.stats_cache.snapshot()?;
        Ok(OwnershipStatistics::generate_summary(&outcome, top))
    }

    /// Detail view of one investor's animals
    pub async fn compose_investor_detail(
        &self,
        investor: &Investor,
        filter: DisplayFilter,
    ) -> InvestorDetailView {
        InvestorDetailComposer::new(self.api.as_ref(), &self.config)
            .compose(investor, filter)
            .await
    }
}
