//! Name lookups joined into investor detail rows

use rustc_hash::FxHashMap;

use crate::models::{Employee, EmployeeRole, Farm, Shed};

/// Farm id → farm name
#[derive(Debug, Clone, Default)]
pub struct FarmLookup {
    names: FxHashMap<String, String>,
}

impl FarmLookup {
    /// Build from the farm list; farms without a name are left out
    #[must_use]
    pub fn from_farms(farms: &[Farm]) -> Self {
        let names = farms
            .iter()
            .filter_map(|f| f.name.as_ref().map(|name| (f.id.clone(), name.clone())))
            .collect();
        Self { names }
    }

    /// Farm name, `Farm #<id>` when unresolved, `missing` without an id
    #[must_use]
    pub fn name_for(&self, farm_id: Option<&str>, missing: &str) -> String {
        match farm_id {
            Some(id) => self
                .names
                .get(id)
                .cloned()
                .unwrap_or_else(|| format!("Farm #{id}")),
            None => missing.to_string(),
        }
    }
}

/// Shed id → shed name
#[derive(Debug, Clone, Default)]
pub struct ShedLookup {
    names: FxHashMap<String, String>,
}

impl ShedLookup {
    /// Add the sheds of one farm
    pub fn extend(&mut self, sheds: &[Shed]) {
        for shed in sheds {
            if let Some(name) = &shed.name {
                self.names.insert(shed.id.clone(), name.clone());
            }
        }
    }

    /// Shed name, `Shed #<id>` when unresolved, `missing` without an id
    #[must_use]
    pub fn name_for(&self, shed_id: Option<&str>, missing: &str) -> String {
        match shed_id {
            Some(id) => self
                .names
                .get(id)
                .cloned()
                .unwrap_or_else(|| format!("Shed #{id}")),
            None => missing.to_string(),
        }
    }
}

/// Staff assignments looked up by role and farm
#[derive(Debug, Clone, Default)]
pub struct StaffLookup {
    employees: Vec<Employee>,
}

impl StaffLookup {
    /// Build from the employee list
    #[must_use]
    pub const fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    /// First employee holding `role` on `farm_id`, or `unassigned`
    #[must_use]
    pub fn name_for(&self, role: &EmployeeRole, farm_id: Option<&str>, unassigned: &str) -> String {
        let Some(farm_id) = farm_id else {
            return unassigned.to_string();
        };
        self.employees
            .iter()
            .find(|e| e.farm_id.as_deref() == Some(farm_id) && e.has_role(role))
            .map(Employee::display_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| unassigned.to_string())
    }
}
