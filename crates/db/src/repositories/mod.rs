//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod audit;
pub mod department;
pub mod fixed_cost;
pub mod objective;
pub mod odoo_connection;
pub mod planned_hours;
pub mod result;
pub mod retainer;
pub mod settings;

pub use audit::{AuditEntry, AuditRepository};
pub use department::{
    CreateDepartmentInput, DepartmentError, DepartmentRepository, UpdateDepartmentInput,
};
pub use fixed_cost::{
    CreateFixedCostInput, FixedCostError, FixedCostRepository, UpdateFixedCostInput,
};
pub use objective::{ObjectiveError, ObjectiveRepository, UpsertObjectiveInput};
pub use odoo_connection::{
    OdooConnectionError, OdooConnectionRepository, UpsertOdooConnectionInput,
};
pub use planned_hours::{PlannedHoursError, PlannedHoursRepository, UpsertPlannedHoursInput};
pub use result::{ResultError, ResultRepository};
pub use retainer::{
    CreateCatalogInput, CreateRetainerInput, RetainerError, RetainerRepository,
    UpdateCatalogInput, UpdateRetainerInput,
};
pub use settings::{SettingsError, SettingsRepository};
