//! Investor detail composition
//!
//! Fetches an investor's animals, resolves linked calves per buffalo and
//! joins in farm, shed and staff names. Every sub-fetch may fail on its own;
//! failures are logged, recorded in `degraded`, and replaced by fallbacks.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use itertools::Itertools;
use log::{debug, warn};

use crate::algorithm::ownership::CalfDedupSet;
use crate::common::traits::LivestockApi;
use crate::config::OwnershipConfig;
use crate::detail::filter::{BuffaloGroup, RowContext, apply_filter};
use crate::detail::lookup::{FarmLookup, ShedLookup, StaffLookup};
use crate::error::Result;
use crate::models::{
    AnimalKind, DisplayFilter, Employee, Farm, Investor, InvestorDetailView, NormalizedAnimal, Shed,
};
use crate::normalize::{Normalizer, extract_records, parse_list};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Builds investor detail views from the API
pub struct InvestorDetailComposer<'a> {
    api: &'a dyn LivestockApi,
    config: &'a OwnershipConfig,
    normalizer: Normalizer,
}

impl<'a> InvestorDetailComposer<'a> {
    /// Create a composer over the given API
    #[must_use]
    pub fn new(api: &'a dyn LivestockApi, config: &'a OwnershipConfig) -> Self {
        Self {
            api,
            config,
            normalizer: Normalizer::new(config.placeholder_prefix.clone()),
        }
    }

    /// Compose the detail view of one investor
    ///
    /// Never fails: missing data shows up as fallback labels and as
    /// entries in [`InvestorDetailView::degraded`].
    pub async fn compose(&self, investor: &Investor, filter: DisplayFilter) -> InvestorDetailView {
        let start = Instant::now();
        log_operation_start("Composing detail view for investor", &investor.id);
        let mut degraded = Vec::new();

        let animals = match self.fetch_investor_animals(&investor.id).await {
            Ok(animals) => animals,
            Err(e) => {
                warn!("Could not load animals of investor {}: {e}", investor.id);
                degraded.push(format!("animals/{}", investor.id));
                Vec::new()
            }
        };

        let (buffaloes, calves): (Vec<_>, Vec<_>) = animals
            .into_iter()
            .filter(|animal| {
                if animal.kind.is_none() {
                    debug!("Leaving unclassified animal {} out of the detail view", animal.id);
                }
                animal.kind.is_some()
            })
            .partition(NormalizedAnimal::is_buffalo);

        let groups = self.link_calves(buffaloes, &mut degraded).await;
        let ctx = self.build_context(&groups, &calves, &mut degraded).await;
        let rows = apply_filter(filter, &groups, &calves, &ctx);

        let mut distinct = CalfDedupSet::new();
        let calf_count = groups
            .iter()
            .flat_map(|g| &g.calves)
            .chain(&calves)
            .filter(|calf| distinct.add_if_new(calf.dedup_identity()))
            .count();

        log_operation_complete("composed", &investor.id, rows.len(), Some(start.elapsed()));

        InvestorDetailView {
            investor: investor.clone(),
            filter,
            rows,
            buffalo_count: groups.len(),
            calf_count,
            degraded,
        }
    }

    async fn fetch_investor_animals(&self, investor_id: &str) -> Result<Vec<NormalizedAnimal>> {
        let payload = self.api.fetch_animals_by_investor(investor_id).await?;
        let records = extract_records(payload)?;
        Ok(self.normalizer.normalize_all(&records))
    }

    /// Resolve linked calves for every buffalo, keeping buffalo order
    async fn link_calves(
        &self,
        buffaloes: Vec<NormalizedAnimal>,
        degraded: &mut Vec<String>,
    ) -> Vec<BuffaloGroup> {
        let concurrency = self.config.calf_fetch_concurrency.max(1);
        let mut results: Vec<(usize, BuffaloGroup, Option<String>)> =
            stream::iter(buffaloes.into_iter().enumerate())
                .map(|(index, buffalo)| async move {
                    let (group, failure) = self.linked_calves(buffalo).await;
                    (index, group, failure)
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;

        results.sort_by_key(|(index, _, _)| *index);
        results
            .into_iter()
            .map(|(_, group, failure)| {
                degraded.extend(failure);
                group
            })
            .collect()
    }

    /// Embedded calves plus calves fetched by the buffalo's RFID, deduplicated
    async fn linked_calves(&self, buffalo: NormalizedAnimal) -> (BuffaloGroup, Option<String>) {
        let mut seen = CalfDedupSet::new();
        let mut calves: Vec<NormalizedAnimal> = buffalo
            .embedded_calves
            .iter()
            .filter(|calf| seen.add_if_new(calf.dedup_identity()))
            .cloned()
            .collect();

        let mut failure = None;
        if let Some(tag) = buffalo.lookup_tag() {
            match self.fetch_calves_by_tag(tag, &buffalo).await {
                Ok(fetched) => {
                    calves.extend(
                        fetched
                            .into_iter()
                            .filter(|calf| seen.add_if_new(calf.dedup_identity())),
                    );
                }
                Err(e) => {
                    warn!("Could not load calves of buffalo {tag}: {e}");
                    failure = Some(format!("calves/{tag}"));
                }
            }
        }

        (BuffaloGroup { buffalo, calves }, failure)
    }

    async fn fetch_calves_by_tag(
        &self,
        tag: &str,
        parent: &NormalizedAnimal,
    ) -> Result<Vec<NormalizedAnimal>> {
        let payload = self.api.fetch_calves_by_tag(tag).await?;
        let records = extract_records(payload)?;
        let prefix = format!("{}-{}", self.config.placeholder_prefix, parent.id);
        let normalizer = Normalizer::new(prefix);

        Ok(records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let mut calf = normalizer.normalize_record(record, index);
                calf.kind = Some(AnimalKind::Calf);
                if calf.parent_id.is_none() {
                    calf.parent_id = Some(parent.id.clone());
                }
                if calf.investor_id.is_none() {
                    calf.investor_id.clone_from(&parent.investor_id);
                }
                calf
            })
            .collect())
    }

    /// Fetch farm, shed and employee lookups for the animals on view
    async fn build_context(
        &self,
        groups: &[BuffaloGroup],
        calves: &[NormalizedAnimal],
        degraded: &mut Vec<String>,
    ) -> RowContext {
        let (farms, employees) = futures::join!(
            async { self.api.fetch_all_farms().await.and_then(parse_list::<Farm>) },
            async { self.api.fetch_all_employees().await.and_then(parse_list::<Employee>) },
        );

        let farms = farms.unwrap_or_else(|e| {
            warn!("Could not load farms: {e}");
            degraded.push("farms".to_string());
            Vec::new()
        });
        let employees = employees.unwrap_or_else(|e| {
            warn!("Could not load employees: {e}");
            degraded.push("employees".to_string());
            Vec::new()
        });

        let farm_ids: Vec<&str> = groups
            .iter()
            .flat_map(|g| std::iter::once(&g.buffalo).chain(&g.calves))
            .chain(calves)
            .filter_map(|animal| animal.farm_id.as_deref())
            .unique()
            .collect();

        let shed_results = futures::future::join_all(farm_ids.iter().map(|&farm_id| async move {
            let sheds = self
                .api
                .fetch_sheds_by_farm(farm_id)
                .await
                .and_then(parse_list::<Shed>);
            (farm_id, sheds)
        }))
        .await;

        let mut sheds = ShedLookup::default();
        for (farm_id, result) in shed_results {
            match result {
                Ok(list) => sheds.extend(&list),
                Err(e) => {
                    warn!("Could not load sheds of farm {farm_id}: {e}");
                    degraded.push(format!("sheds/{farm_id}"));
                }
            }
        }

        RowContext {
            farms: FarmLookup::from_farms(&farms),
            sheds,
            staff: StaffLookup::new(employees),
            missing_label: self.config.missing_label.clone(),
            unassigned_label: self.config.unassigned_label.clone(),
        }
    }
}
