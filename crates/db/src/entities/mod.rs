//! `SeaORM` entity definitions.

pub mod audit_logs;
pub mod departments;
pub mod fixed_costs;
pub mod global_settings;
pub mod objectives;
pub mod odoo_connections;
pub mod planned_hours;
pub mod results;
pub mod retainer_catalog;
pub mod retainers;
pub mod sea_orm_active_enums;
