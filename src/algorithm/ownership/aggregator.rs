//! Ownership aggregation
//!
//! Folds the full animal collection into per-investor counts and global
//! totals in two passes over the top-level records:
//!
//! 1. [`AggregationPass::seed_calf_identities`] records every top-level
//!    calf in the dedup set without counting anything.
//! 2. [`AggregationPass::count_animals`] counts buffaloes, top-level calves
//!    and the embedded calves whose identity was not seeded or seen.
//!
//! Seeding must finish before counting starts, otherwise an embedded copy
//! of a calf that also appears at the top level is counted twice.
//! Malformed records are skipped, never reported as errors.

use std::time::Instant;

use itertools::Itertools;
use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::algorithm::ownership::dedup::CalfDedupSet;
use crate::models::{
    AggregationDiagnostics, AnimalKind, GlobalTotals, NormalizedAnimal, OwnershipStats,
    RawAnimalRecord,
};
use crate::normalize::Normalizer;

/// Result of one full aggregation pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregationOutcome {
    /// Counts per investor: every scoped investor plus every owner seen
    pub by_investor: FxHashMap<String, OwnershipStats>,
    /// Sums across the whole collection
    pub totals: GlobalTotals,
    /// Reconciliation findings
    pub diagnostics: AggregationDiagnostics,
}

impl AggregationOutcome {
    /// Counts for an investor; a known zero when the pass never saw them
    #[must_use]
    pub fn stats_for(&self, investor_id: &str) -> OwnershipStats {
        self.by_investor
            .get(investor_id)
            .cloned()
            .unwrap_or_else(|| OwnershipStats::zero(investor_id))
    }
}

/// Aggregates raw records after normalizing them
#[derive(Debug, Clone, Default)]
pub struct OwnershipAggregator {
    normalizer: Normalizer,
}

impl OwnershipAggregator {
    /// Create an aggregator using the given normalizer
    #[must_use]
    pub const fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Normalize and aggregate raw records for the scoped investors
    ///
    /// Owners outside the scope are reported as orphans.
    #[must_use]
    pub fn aggregate(
        &self,
        raw_animals: &[RawAnimalRecord],
        scope_investor_ids: &[String],
    ) -> AggregationOutcome {
        self.aggregate_reconciled(raw_animals, scope_investor_ids, None)
    }

    /// Like [`aggregate`](Self::aggregate), reconciling owners against the
    /// full investor list when one is given instead of against the scope
    #[must_use]
    pub fn aggregate_reconciled(
        &self,
        raw_animals: &[RawAnimalRecord],
        scope_investor_ids: &[String],
        known_investor_ids: Option<&[String]>,
    ) -> AggregationOutcome {
        let start = Instant::now();
        let animals = self.normalizer.normalize_all(raw_animals);
        let outcome = aggregate_normalized(&animals, scope_investor_ids, known_investor_ids);

        info!(
            "Aggregated {} animal records for {} investors in {:?}: {} buffaloes, {} calves",
            raw_animals.len(),
            outcome.by_investor.len(),
            start.elapsed(),
            outcome.totals.total_buffaloes,
            outcome.totals.total_calves
        );
        outcome
    }
}

/// Aggregate already-normalized animals
#[must_use]
pub fn aggregate_normalized(
    animals: &[NormalizedAnimal],
    scope_investor_ids: &[String],
    known_investor_ids: Option<&[String]>,
) -> AggregationOutcome {
    let mut pass = AggregationPass::new(scope_investor_ids);
    if let Some(known) = known_investor_ids {
        pass = pass.with_known_investors(known);
    }
    pass.seed_calf_identities(animals);
    pass.count_animals(animals);
    pass.finalize()
}

/// State of one aggregation pass; consumed by [`AggregationPass::finalize`]
#[derive(Debug)]
pub struct AggregationPass {
    scope: FxHashSet<String>,
    known: Option<FxHashSet<String>>,
    by_investor: FxHashMap<String, OwnershipStats>,
    totals: GlobalTotals,
    diagnostics: AggregationDiagnostics,
    seeded: CalfDedupSet,
    counted_top_level: CalfDedupSet,
}

impl AggregationPass {
    /// Start a pass with a known-zero entry for every scoped investor
    #[must_use]
    pub fn new(scope_investor_ids: &[String]) -> Self {
        let by_investor = scope_investor_ids
            .iter()
            .map(|id| (id.clone(), OwnershipStats::zero(id.as_str())))
            .collect();

        Self {
            scope: scope_investor_ids.iter().cloned().collect(),
            known: None,
            by_investor,
            totals: GlobalTotals::default(),
            diagnostics: AggregationDiagnostics::default(),
            seeded: CalfDedupSet::new(),
            counted_top_level: CalfDedupSet::new(),
        }
    }

    /// Reconcile owners against the full investor list
    ///
    /// Without it, any owner outside the scope counts as orphaned.
    #[must_use]
    pub fn with_known_investors(mut self, investor_ids: &[String]) -> Self {
        self.known = Some(investor_ids.iter().cloned().collect());
        self
    }

    /// Pass 1: record the identity of every top-level calf
    pub fn seed_calf_identities(&mut self, animals: &[NormalizedAnimal]) {
        for calf in animals.iter().filter(|a| a.is_calf()) {
            self.seeded.add(calf.dedup_identity());
        }
        debug!("Seeded {} top-level calf identities", self.seeded.len());
    }

    /// Pass 2: count buffaloes and calves per owner
    pub fn count_animals(&mut self, animals: &[NormalizedAnimal]) {
        for animal in animals {
            self.diagnostics.records_seen += 1;
            if !animal.identity_source.is_stable() {
                self.diagnostics.placeholder_identities += 1;
            }

            match animal.kind {
                Some(AnimalKind::Buffalo) => self.count_buffalo(animal),
                Some(AnimalKind::Calf) => self.count_top_level_calf(animal),
                None => {
                    self.diagnostics.unclassified_records += 1;
                    debug!("Skipping unclassified record {}", animal.id);
                }
            }
        }
    }

    fn count_buffalo(&mut self, buffalo: &NormalizedAnimal) {
        self.totals.total_buffaloes += 1;
        match self.owner_entry(buffalo) {
            Some(stats) => stats.buffalo_count += 1,
            None => self.diagnostics.unowned_animals += 1,
        }

        for calf in &buffalo.embedded_calves {
            if !calf.identity_source.is_stable() {
                self.diagnostics.placeholder_identities += 1;
            }
            let identity = calf.dedup_identity();
            if self.seeded.has(identity) {
                self.diagnostics.duplicate_calves_skipped += 1;
                debug!("Calf {identity} under buffalo {} already counted", buffalo.id);
                continue;
            }
            // Later occurrences in other buffaloes are skipped too.
            self.seeded.add(identity);

            self.totals.total_calves += 1;
            match self.owner_entry(buffalo) {
                Some(stats) => stats.calf_count += 1,
                None => self.diagnostics.unowned_animals += 1,
            }
        }
    }

    fn count_top_level_calf(&mut self, calf: &NormalizedAnimal) {
        if !self.counted_top_level.add_if_new(calf.dedup_identity()) {
            self.diagnostics.duplicate_calves_skipped += 1;
            debug!("Top-level calf {} listed more than once", calf.id);
            return;
        }

        self.totals.total_calves += 1;
        match self.owner_entry(calf) {
            Some(stats) => stats.calf_count += 1,
            None => self.diagnostics.unowned_animals += 1,
        }
    }

    /// Stats entry for the animal's owner, created on first sight
    fn owner_entry(&mut self, animal: &NormalizedAnimal) -> Option<&mut OwnershipStats> {
        let owner = animal.investor_id.as_deref()?;
        Some(
            self.by_investor
                .entry(owner.to_string())
                .or_insert_with(|| OwnershipStats::zero(owner)),
        )
    }

    /// Compute totals and collect reconciliation findings
    #[must_use]
    pub fn finalize(mut self) -> AggregationOutcome {
        for stats in self.by_investor.values_mut() {
            stats.finalize();
        }
        self.totals.total_animals = self.totals.total_buffaloes + self.totals.total_calves;

        let known = self.known.as_ref();
        let is_known = |id: &String| {
            self.scope.contains(id) || known.is_some_and(|known| known.contains(id))
        };
        self.diagnostics.orphaned_owners = self
            .by_investor
            .keys()
            .filter(|id| !is_known(id))
            .cloned()
            .sorted()
            .collect();

        if !self.diagnostics.orphaned_owners.is_empty() {
            match known {
                Some(known) => warn!(
                    "{} owner ids are missing from the list of {} investors",
                    self.diagnostics.orphaned_owners.len(),
                    known.len()
                ),
                None if !self.scope.is_empty() => warn!(
                    "{} owner ids are not among the {} scoped investors",
                    self.diagnostics.orphaned_owners.len(),
                    self.scope.len()
                ),
                None => {}
            }
        }
        if self.diagnostics.placeholder_identities > 0 {
            warn!(
                "{} animals have neither id nor RFID; their identities are positional",
                self.diagnostics.placeholder_identities
            );
        }

        AggregationOutcome {
            by_investor: self.by_investor,
            totals: self.totals,
            diagnostics: self.diagnostics,
        }
    }
}
