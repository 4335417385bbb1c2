//! Odoo hours synchronization.
//!
//! Pulls billable hours per department from Odoo for one month, lands
//! them in the hours plan, and reruns the result engine for every touched
//! department. Business failures (bad year, unreachable server, wrong
//! credentials) are reported in the [`SyncOutcome`], not as transport
//! errors; the caller always gets a structured answer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, warn};

use pulso_core::fiscal::Period;
use pulso_odoo::crypto::CryptoError;
use pulso_odoo::{AuthContext, BillingType, CredentialCipher, OdooClient, OdooError};

use crate::entities::departments;
use crate::entities::sea_orm_active_enums::SyncStatus;
use crate::repositories::{
    CreateDepartmentInput, DepartmentError, DepartmentRepository, OdooConnectionError,
    OdooConnectionRepository, PlannedHoursError, PlannedHoursRepository,
};
use crate::services::calculation::{CalculationError, CalculationService};

/// Hours are only synced from this year onward; earlier data in Odoo is
/// incomplete and must never overwrite hand-entered history.
pub const MIN_SYNC_YEAR: i32 = 2026;

/// Error types for sync infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No usable connection record.
    #[error(transparent)]
    Connection(#[from] OdooConnectionError),

    /// Stored password could not be decrypted.
    #[error("Stored Odoo password could not be decrypted: {0}")]
    Crypto(#[from] CryptoError),

    /// RPC-level failure.
    #[error(transparent)]
    Odoo(#[from] OdooError),

    /// Department persistence failure.
    #[error(transparent)]
    Department(#[from] DepartmentError),

    /// Hours persistence failure.
    #[error(transparent)]
    PlannedHours(#[from] PlannedHoursError),

    /// Result engine failure.
    #[error(transparent)]
    Calculation(#[from] CalculationError),
}

/// Structured outcome of one sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// True when every department landed without error.
    pub success: bool,
    /// Departments whose hours were stored.
    pub synced_count: u32,
    /// Per-department (or run-level) error messages.
    pub errors: Vec<String>,
    /// When the run finished.
    pub last_sync_at: DateTime<Utc>,
}

impl SyncOutcome {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            synced_count: 0,
            errors: vec![message],
            last_sync_at: Utc::now(),
        }
    }
}

/// Odoo synchronization service.
#[derive(Debug, Clone)]
pub struct OdooSyncService {
    connections: OdooConnectionRepository,
    departments: DepartmentRepository,
    planned_hours: PlannedHoursRepository,
    calculation: CalculationService,
    cipher: CredentialCipher,
    rpc_timeout: Duration,
}

impl OdooSyncService {
    /// Creates a sync service.
    ///
    /// `cipher` must be built from the same credential key the password
    /// was stored with; `rpc_timeout` bounds every individual RPC.
    #[must_use]
    pub fn new(db: DatabaseConnection, cipher: CredentialCipher, rpc_timeout: Duration) -> Self {
        Self {
            connections: OdooConnectionRepository::new(db.clone()),
            departments: DepartmentRepository::new(db.clone()),
            planned_hours: PlannedHoursRepository::new(db.clone()),
            calculation: CalculationService::new(db),
            cipher,
            rpc_timeout,
        }
    }

    /// Builds a client and authenticates with the stored connection.
    async fn connect(&self) -> Result<(OdooClient, AuthContext), SyncError> {
        let connection = self.connections.get_active().await?;
        let password = self.cipher.decrypt(&connection.encrypted_password)?;
        let client = OdooClient::new(&connection.url, self.rpc_timeout)?;
        let uid = client
            .authenticate(&connection.database, &connection.username, &password)
            .await?;
        Ok((
            client,
            AuthContext {
                database: connection.database,
                uid,
                password,
            },
        ))
    }

    /// Verifies the stored connection by authenticating and listing
    /// departments.
    ///
    /// Returns the department count so an operator can see at a glance
    /// whether the configured database holds the expected data.
    ///
    /// # Errors
    ///
    /// Returns the underlying configuration, crypto, or RPC failure.
    pub async fn test_connection(&self) -> Result<usize, SyncError> {
        let (client, auth) = self.connect().await?;
        let departments = client.fetch_departments(&auth).await?;
        Ok(departments.len())
    }

    /// Syncs billable hours for one month and reruns the result engine.
    ///
    /// The year guard runs before any RPC: months before [`MIN_SYNC_YEAR`]
    /// are rejected outright. Per-department failures are accumulated and
    /// do not stop the run; the connection record is stamped with the
    /// overall status afterwards.
    ///
    /// # Errors
    ///
    /// Only database failures while stamping the connection record
    /// propagate as `Err`; everything else lands in the outcome.
    pub async fn sync_hours(
        &self,
        period: Period,
        billing_types: &[BillingType],
    ) -> Result<SyncOutcome, SyncError> {
        if period.year < MIN_SYNC_YEAR {
            return Ok(SyncOutcome::failure(format!(
                "Sync is only available from {MIN_SYNC_YEAR} onward, got {}",
                period.year
            )));
        }

        let (client, auth) = match self.connect().await {
            Ok(session) => session,
            Err(err @ SyncError::Connection(OdooConnectionError::NotConfigured)) => {
                return Ok(SyncOutcome::failure(err.to_string()));
            }
            Err(err) => {
                self.stamp(SyncStatus::Error, Some(err.to_string())).await;
                return Ok(SyncOutcome::failure(err.to_string()));
            }
        };

        let groups = match client
            .fetch_hours_by_department(&auth, period, billing_types)
            .await
        {
            Ok(groups) => groups,
            Err(err) => {
                self.stamp(SyncStatus::Error, Some(err.to_string())).await;
                return Ok(SyncOutcome::failure(err.to_string()));
            }
        };

        let mut synced_count = 0_u32;
        let mut errors = Vec::new();
        for group in groups {
            match self.land_group(&group.department_name, group.hours, period).await {
                Ok(()) => synced_count += 1,
                Err(err) => {
                    warn!(department = %group.department_name, error = %err, "sync failed for department");
                    errors.push(format!("{}: {err}", group.department_name));
                }
            }
        }

        let success = errors.is_empty();
        let status = if success { SyncStatus::Success } else { SyncStatus::Error };
        let error_text = if success { None } else { Some(errors.join("; ")) };
        self.stamp(status, error_text).await;

        info!(%period, synced_count, error_count = errors.len(), "odoo hours sync finished");
        Ok(SyncOutcome {
            success,
            synced_count,
            errors,
            last_sync_at: Utc::now(),
        })
    }

    /// Lands one department's hours and reruns its result.
    ///
    /// Departments are matched by exact name; an unknown name creates a
    /// department with default parameters so the hours are never dropped.
    async fn land_group(
        &self,
        department_name: &str,
        hours: rust_decimal::Decimal,
        period: Period,
    ) -> Result<(), SyncError> {
        let department = self.ensure_department(department_name).await?;
        self.planned_hours
            .record_synced_hours(department.id, period, hours)
            .await?;
        self.calculation
            .calculate_department_result(department.id, period)
            .await?;
        Ok(())
    }

    /// Finds a department by exact name, creating it when missing.
    ///
    /// A freshly created department gets its annual metrics derived right
    /// away, best effort; a metrics failure never blocks the hours from
    /// landing.
    async fn ensure_department(
        &self,
        department_name: &str,
    ) -> Result<departments::Model, SyncError> {
        if let Some(existing) = self.departments.find_by_name(department_name).await? {
            return Ok(existing);
        }

        let created = self
            .departments
            .create(CreateDepartmentInput {
                name: department_name.to_owned(),
                code: None,
                billable_headcount: None,
                cost_per_person_per_month: None,
                target_utilization: None,
                average_hourly_rate: None,
            })
            .await?;
        if let Err(err) = self
            .calculation
            .calculate_annual_metrics(created.id, Period::current())
            .await
        {
            warn!(department_id = %created.id, error = %err, "annual metrics refresh failed");
        }
        Ok(created)
    }

    /// Stamps the sync status on the connection record, best effort.
    async fn stamp(&self, status: SyncStatus, error: Option<String>) {
        if let Err(err) = self.connections.record_sync_outcome(status, error).await {
            warn!(error = %err, "failed to stamp sync status on connection record");
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::entities::{fixed_costs, global_settings};

    use super::*;

    fn service() -> OdooSyncService {
        OdooSyncService::new(
            DatabaseConnection::default(),
            CredentialCipher::new("test-key"),
            Duration::from_secs(5),
        )
    }

    fn department(name: &str) -> departments::Model {
        let now = Utc::now().into();
        departments::Model {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            code: Some("NOVO".to_owned()),
            billable_headcount: 1,
            cost_per_person_per_month: None,
            target_utilization: Decimal::new(65, 2),
            average_hourly_rate: Decimal::from(50),
            is_active: true,
            direct_cost_annual: None,
            billable_hours_annual: None,
            revenue_capacity_annual: None,
            overhead_allocated_annual: None,
            minimum_revenue_annual: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_failure_outcome_shape() {
        let outcome = SyncOutcome::failure("boom".to_owned());
        assert!(!outcome.success);
        assert_eq!(outcome.synced_count, 0);
        assert_eq!(outcome.errors, vec!["boom".to_owned()]);
    }

    // The year guard runs before any connection lookup or RPC, so a
    // disconnected database is never touched.
    #[tokio::test]
    async fn test_sync_rejects_years_before_cutover() {
        let period = Period::new(12, MIN_SYNC_YEAR - 1).unwrap();
        let outcome = service()
            .sync_hours(period, &[BillingType::Timesheet])
            .await
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.synced_count, 0);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains(&MIN_SYNC_YEAR.to_string()));
    }

    #[tokio::test]
    async fn test_sync_rejects_distant_past() {
        let period = Period::new(1, 1999).unwrap();
        let outcome = service().sync_hours(period, &[]).await.unwrap();
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_known_department_is_not_recreated() {
        let existing = department("Design");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()]])
            .into_connection();

        let service =
            OdooSyncService::new(db.clone(), CredentialCipher::new("test-key"), Duration::from_secs(5));
        let ensured = service.ensure_department("Design").await.unwrap();

        assert_eq!(ensured.id, existing.id);
        // Only the name lookup ran.
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    // A department auto-created during a sync must come out with its
    // annual metrics derived, the same as one created by hand.
    #[tokio::test]
    async fn test_auto_created_department_gets_annual_metrics() {
        let created = department("Novo");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // name lookup misses; create re-checks the name and scans codes
            .append_query_results([
                Vec::<departments::Model>::new(),
                Vec::new(),
                Vec::new(),
            ])
            // insert returns the new row
            .append_query_results([vec![created.clone()]])
            // metrics pass reloads the department
            .append_query_results([vec![created.clone()]])
            // no stored settings, no fixed costs: defaults apply
            .append_query_results([Vec::<global_settings::Model>::new()])
            .append_query_results([Vec::<fixed_costs::Model>::new()])
            // headcount denominator, then the reload before the write
            .append_query_results([vec![created.clone()], vec![created.clone()]])
            // the annual columns update
            .append_query_results([vec![created.clone()]])
            .into_connection();

        let service =
            OdooSyncService::new(db.clone(), CredentialCipher::new("test-key"), Duration::from_secs(5));
        let ensured = service.ensure_department("Novo").await.unwrap();
        assert_eq!(ensured.id, created.id);

        // Creation alone only issues selects and an insert; the metrics
        // pass resolves the settings and ends in a departments update.
        let log = db.into_transaction_log();
        assert!(
            log.iter().any(|t| format!("{t:?}").contains("global_settings")),
            "auto-created department never went through the metrics pass"
        );
        assert!(
            log.iter().any(|t| format!("{t:?}").contains("UPDATE")),
            "auto-created department never got its annual metrics stored"
        );
    }
}
