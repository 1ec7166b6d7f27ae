//! Domain models for animal ownership
//!
//! Raw and normalized animal records, ownership statistics, directory
//! entities (investors, farms, sheds, employees) and the investor detail view.

pub mod animal;
pub mod detail;
pub mod directory;
pub mod stats;
pub mod types;

pub use animal::{NormalizedAnimal, RawAnimalRecord};
pub use detail::{AnimalRow, InvestorDetailView};
pub use directory::{Employee, Farm, Investor, Shed};
pub use stats::{AggregationDiagnostics, GlobalTotals, OwnershipStats};
pub use types::{AnimalKind, DisplayFilter, EmployeeRole, IdentitySource};
