//! Initial database migration.
//!
//! Creates all tables, enums, and indexes for the agency dashboard:
//! departments, monthly plans and objectives, retainer contracts, fixed
//! costs, global settings, derived results, the Odoo connection record,
//! and the audit trail.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: DEPARTMENTS
        // ============================================================
        db.execute_unprepared(DEPARTMENTS_SQL).await?;

        // ============================================================
        // PART 3: MONTHLY PLANS & OBJECTIVES
        // ============================================================
        db.execute_unprepared(PLANNED_HOURS_SQL).await?;
        db.execute_unprepared(OBJECTIVES_SQL).await?;

        // ============================================================
        // PART 4: RETAINERS
        // ============================================================
        db.execute_unprepared(RETAINER_CATALOG_SQL).await?;
        db.execute_unprepared(RETAINERS_SQL).await?;

        // ============================================================
        // PART 5: COSTS & SETTINGS
        // ============================================================
        db.execute_unprepared(FIXED_COSTS_SQL).await?;
        db.execute_unprepared(GLOBAL_SETTINGS_SQL).await?;

        // ============================================================
        // PART 6: DERIVED RESULTS
        // ============================================================
        db.execute_unprepared(RESULTS_SQL).await?;

        // ============================================================
        // PART 7: ODOO CONNECTION & AUDIT
        // ============================================================
        db.execute_unprepared(ODOO_CONNECTIONS_SQL).await?;
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Fixed cost categories
CREATE TYPE fixed_cost_category AS ENUM (
    'aluguel',
    'utilidades',
    'software',
    'viaturas',
    'outros'
);

-- Outcome of the last Odoo synchronization
CREATE TYPE sync_status AS ENUM ('success', 'error');
";

const DEPARTMENTS_SQL: &str = r"
CREATE TABLE departments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    code VARCHAR(8) UNIQUE,
    billable_headcount INTEGER NOT NULL DEFAULT 1,
    cost_per_person_per_month NUMERIC(19, 4),
    target_utilization NUMERIC(5, 4) NOT NULL DEFAULT 0.65,
    average_hourly_rate NUMERIC(19, 4) NOT NULL DEFAULT 50,
    is_active BOOLEAN NOT NULL DEFAULT true,

    -- Derived annual metrics, NULL until first calculated
    direct_cost_annual NUMERIC(19, 4),
    billable_hours_annual NUMERIC(19, 4),
    revenue_capacity_annual NUMERIC(19, 4),
    overhead_allocated_annual NUMERIC(19, 4),
    minimum_revenue_annual NUMERIC(19, 4),

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_dept_headcount CHECK (billable_headcount >= 0),
    CONSTRAINT chk_dept_utilization CHECK (target_utilization >= 0 AND target_utilization <= 1)
);

CREATE INDEX idx_departments_active ON departments(name) WHERE is_active = true;
";

const PLANNED_HOURS_SQL: &str = r"
CREATE TABLE planned_hours (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    department_id UUID NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
    month INTEGER NOT NULL,
    year INTEGER NOT NULL,
    billable_headcount INTEGER,
    target_hours_per_month NUMERIC(19, 4),
    target_utilization NUMERIC(5, 4),
    target_available_hours NUMERIC(19, 4),
    actual_billable_hours NUMERIC(19, 4),
    project_revenue NUMERIC(19, 4),
    synced_from_odoo BOOLEAN NOT NULL DEFAULT false,
    last_synced_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_planned_hours_month CHECK (month BETWEEN 1 AND 12),
    UNIQUE (department_id, month, year)
);

CREATE INDEX idx_planned_hours_period ON planned_hours(year, month);
";

const OBJECTIVES_SQL: &str = r"
CREATE TABLE objectives (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    department_id UUID NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
    month INTEGER NOT NULL,
    year INTEGER NOT NULL,
    target_value NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_objectives_month CHECK (month BETWEEN 1 AND 12),
    UNIQUE (department_id, month, year)
);

CREATE INDEX idx_objectives_period ON objectives(year, month);
";

const RETAINER_CATALOG_SQL: &str = r"
CREATE TABLE retainer_catalog (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    department_id UUID NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
    monthly_price NUMERIC(19, 4) NOT NULL,
    hours_per_month NUMERIC(19, 4) NOT NULL,
    internal_hourly_cost NUMERIC(19, 4),

    -- Derived margins, NULL when internal_hourly_cost is unknown
    monthly_cost NUMERIC(19, 4),
    monthly_margin NUMERIC(19, 4),
    margin_percentage NUMERIC(19, 4),

    base_hours NUMERIC(19, 4),
    base_price NUMERIC(19, 4),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_retainer_catalog_dept ON retainer_catalog(department_id);
";

const RETAINERS_SQL: &str = r"
CREATE TABLE retainers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    department_id UUID NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
    catalog_id UUID REFERENCES retainer_catalog(id) ON DELETE SET NULL,
    name VARCHAR(255) NOT NULL,
    contract_type VARCHAR(50) NOT NULL,
    monthly_price NUMERIC(19, 4) NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 1,
    monthly_revenue NUMERIC(19, 4) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE,
    is_active BOOLEAN NOT NULL DEFAULT true,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_retainers_quantity CHECK (quantity >= 1),
    CONSTRAINT chk_retainers_dates CHECK (end_date IS NULL OR end_date >= start_date)
);

CREATE INDEX idx_retainers_dept ON retainers(department_id) WHERE is_active = true;
CREATE INDEX idx_retainers_window ON retainers(start_date, end_date);
";

const FIXED_COSTS_SQL: &str = r"
CREATE TABLE fixed_costs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    category fixed_cost_category NOT NULL DEFAULT 'outros',
    monthly_amount NUMERIC(19, 4) NOT NULL,
    description TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    start_date DATE NOT NULL,
    end_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_fixed_costs_dates CHECK (end_date IS NULL OR end_date >= start_date)
);

CREATE INDEX idx_fixed_costs_active ON fixed_costs(category) WHERE is_active = true;
";

const GLOBAL_SETTINGS_SQL: &str = r"
CREATE TABLE global_settings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    key VARCHAR(100) NOT NULL UNIQUE,
    value VARCHAR(255) NOT NULL,
    description TEXT,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const RESULTS_SQL: &str = r"
CREATE TABLE results (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    department_id UUID NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
    month INTEGER NOT NULL,
    year INTEGER NOT NULL,

    -- NULL means 'never configured'; zero is a real measurement
    planned_hours NUMERIC(19, 4),
    actual_hours NUMERIC(19, 4),
    hourly_rate NUMERIC(19, 4),
    active_retainers NUMERIC(19, 4) NOT NULL DEFAULT 0,
    project_revenue NUMERIC(19, 4),
    revenue_from_hours NUMERIC(19, 4),
    total_revenue NUMERIC(19, 4) NOT NULL DEFAULT 0,
    objective NUMERIC(19, 4),
    performance NUMERIC(19, 4),
    utilization_rate NUMERIC(19, 4),

    calculated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    calculated_by VARCHAR(100) NOT NULL DEFAULT 'system',
    CONSTRAINT chk_results_month CHECK (month BETWEEN 1 AND 12),
    UNIQUE (department_id, month, year)
);

CREATE INDEX idx_results_period ON results(year, month);
";

const ODOO_CONNECTIONS_SQL: &str = r"
CREATE TABLE odoo_connections (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    url VARCHAR(500) NOT NULL,
    database VARCHAR(255) NOT NULL,
    username VARCHAR(255) NOT NULL,
    encrypted_password TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    last_sync_at TIMESTAMPTZ,
    last_sync_status sync_status,
    last_sync_error TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID,
    entity_type VARCHAR(100) NOT NULL,
    entity_id VARCHAR(100) NOT NULL,
    action VARCHAR(50) NOT NULL,
    old_value JSONB,
    new_value JSONB,
    department_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_logs_entity ON audit_logs(entity_type, entity_id);
CREATE INDEX idx_audit_logs_created ON audit_logs(created_at DESC);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TABLE IF EXISTS audit_logs CASCADE;
DROP TABLE IF EXISTS odoo_connections CASCADE;
DROP TABLE IF EXISTS results CASCADE;
DROP TABLE IF EXISTS global_settings CASCADE;
DROP TABLE IF EXISTS fixed_costs CASCADE;
DROP TABLE IF EXISTS retainers CASCADE;
DROP TABLE IF EXISTS retainer_catalog CASCADE;
DROP TABLE IF EXISTS objectives CASCADE;
DROP TABLE IF EXISTS planned_hours CASCADE;
DROP TABLE IF EXISTS departments CASCADE;

DROP TYPE IF EXISTS sync_status CASCADE;
DROP TYPE IF EXISTS fixed_cost_category CASCADE;
";
