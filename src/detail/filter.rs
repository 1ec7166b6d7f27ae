//! Row shaping for the investor detail view

use crate::algorithm::ownership::CalfDedupSet;
use crate::detail::lookup::{FarmLookup, ShedLookup, StaffLookup};
use crate::models::{AnimalRow, DisplayFilter, EmployeeRole, NormalizedAnimal};

/// A buffalo with the calves linked to it
#[derive(Debug, Clone)]
pub struct BuffaloGroup {
    /// The parent buffalo
    pub buffalo: NormalizedAnimal,
    /// Distinct linked calves, embedded ones first
    pub calves: Vec<NormalizedAnimal>,
}

/// Lookups and labels used to render rows
#[derive(Debug, Clone, Default)]
pub struct RowContext {
    /// Farm names
    pub farms: FarmLookup,
    /// Shed names
    pub sheds: ShedLookup,
    /// Doctor and manager assignments
    pub staff: StaffLookup,
    /// Label for lookups with nothing to resolve
    pub missing_label: String,
    /// Label for roles nobody holds
    pub unassigned_label: String,
}

impl RowContext {
    /// Render one animal, taking location from `parent` where it has none
    #[must_use]
    pub fn row(&self, animal: &NormalizedAnimal, parent: Option<&NormalizedAnimal>) -> AnimalRow {
        let farm_id = animal.farm_id.clone().or_else(|| parent.and_then(|p| p.farm_id.clone()));
        let shed_id = animal.shed_id.clone().or_else(|| parent.and_then(|p| p.shed_id.clone()));
        let position = animal
            .position
            .clone()
            .or_else(|| parent.and_then(|p| p.position.clone()));

        AnimalRow {
            id: animal.id.clone(),
            rfid: animal.rfid.clone(),
            kind: animal.kind_label(),
            parent_id: animal
                .parent_id
                .clone()
                .or_else(|| parent.map(|p| p.id.clone())),
            farm_name: self.farms.name_for(farm_id.as_deref(), &self.missing_label),
            shed_name: self.sheds.name_for(shed_id.as_deref(), &self.missing_label),
            position: position.unwrap_or_else(|| self.missing_label.clone()),
            doctor_name: self.staff.name_for(
                &EmployeeRole::Doctor,
                farm_id.as_deref(),
                &self.unassigned_label,
            ),
            manager_name: self.staff.name_for(
                &EmployeeRole::Manager,
                farm_id.as_deref(),
                &self.unassigned_label,
            ),
            farm_id,
            shed_id,
            linked_calves: Vec::new(),
        }
    }

    fn buffalo_row(&self, group: &BuffaloGroup) -> AnimalRow {
        let mut row = self.row(&group.buffalo, None);
        row.linked_calves = group
            .calves
            .iter()
            .map(|calf| self.row(calf, Some(&group.buffalo)))
            .collect();
        row
    }
}

/// Standalone calves not already nested under one of the buffaloes
#[must_use]
pub fn standalone_calves<'a>(
    groups: &[BuffaloGroup],
    calves: &'a [NormalizedAnimal],
) -> Vec<&'a NormalizedAnimal> {
    let mut nested = CalfDedupSet::new();
    for calf in groups.iter().flat_map(|g| &g.calves) {
        nested.add(calf.dedup_identity());
    }
    calves
        .iter()
        .filter(|calf| nested.add_if_new(calf.dedup_identity()))
        .collect()
}

/// The buffalo a standalone calf names as its parent, by id or tag
fn parent_of<'a>(
    groups: &'a [BuffaloGroup],
    calf: &NormalizedAnimal,
) -> Option<&'a NormalizedAnimal> {
    let parent_id = calf.parent_id.as_deref()?;
    groups
        .iter()
        .map(|g| &g.buffalo)
        .find(|b| b.id == parent_id || b.lookup_tag() == Some(parent_id))
}

fn standalone_rows<'a>(
    standalone: &'a [&'a NormalizedAnimal],
    groups: &'a [BuffaloGroup],
    ctx: &'a RowContext,
) -> impl Iterator<Item = AnimalRow> + 'a {
    standalone
        .iter()
        .map(move |calf| ctx.row(calf, parent_of(groups, calf)))
}

/// Shape rows according to the filter
///
/// `Buffalo` gives buffalo rows with nested calves, `All` adds standalone
/// calves after them, and `Calf` flattens every calf into its own row.
/// Standalone calves take their location from the buffalo they name as
/// parent when it is among `groups`.
#[must_use]
pub fn apply_filter(
    filter: DisplayFilter,
    groups: &[BuffaloGroup],
    calves: &[NormalizedAnimal],
    ctx: &RowContext,
) -> Vec<AnimalRow> {
    let standalone = standalone_calves(groups, calves);
    match filter {
        DisplayFilter::Buffalo => groups.iter().map(|g| ctx.buffalo_row(g)).collect(),
        DisplayFilter::All => groups
            .iter()
            .map(|g| ctx.buffalo_row(g))
            .chain(standalone_rows(&standalone, groups, ctx))
            .collect(),
        DisplayFilter::Calf => groups
            .iter()
            .flat_map(|g| g.calves.iter().map(move |calf| ctx.row(calf, Some(&g.buffalo))))
            .chain(standalone_rows(&standalone, groups, ctx))
            .collect(),
    }
}
