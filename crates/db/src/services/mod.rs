//! Orchestration services.
//!
//! Services compose repositories and the pure calculation logic into the
//! operations the API exposes: the monthly result engine, annual metrics,
//! and the Odoo hours sync.

pub mod calculation;
pub mod odoo_sync;

pub use calculation::{CalculationError, CalculationService, YearRecalculation};
pub use odoo_sync::{OdooSyncService, SyncError, SyncOutcome};
