//! PostgreSQL implementation of TenantDirectory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, OrganizationId, StaffId, Timestamp};
use crate::domain::tenancy::{DateFormat, Organization, Staff, SystemPreference};
use crate::ports::TenantDirectory;

pub struct PostgresTenantDirectory {
    pool: PgPool,
}

impl PostgresTenantDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StaffRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    email: String,
    designation: Option<String>,
    is_verified: bool,
}

impl From<StaffRow> for Staff {
    fn from(row: StaffRow) -> Self {
        Staff {
            id: StaffId::from_uuid(row.id),
            organization_id: OrganizationId::from_uuid(row.organization_id),
            name: row.name,
            email: row.email,
            designation: row.designation,
            is_verified: row.is_verified,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    region: Option<String>,
    country: Option<String>,
    is_gst_registered: bool,
    gstin: Option<String>,
    is_email_verified: bool,
    is_blocked: bool,
    created_at: DateTime<Utc>,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Organization {
            id: OrganizationId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            region: row.region,
            country: row.country,
            is_gst_registered: row.is_gst_registered,
            gstin: row.gstin,
            is_email_verified: row.is_email_verified,
            is_blocked: row.is_blocked,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PreferenceRow {
    organization_id: Uuid,
    language: String,
    date_format: String,
    time_zone: String,
    currency: String,
    theme: String,
    is_setup_complete: bool,
}

impl From<PreferenceRow> for SystemPreference {
    fn from(row: PreferenceRow) -> Self {
        SystemPreference {
            organization_id: OrganizationId::from_uuid(row.organization_id),
            language: row.language,
            date_format: DateFormat::parse_or_default(&row.date_format),
            time_zone: row.time_zone,
            currency: row.currency,
            theme: row.theme,
            is_setup_complete: row.is_setup_complete,
        }
    }
}

#[async_trait]
impl TenantDirectory for PostgresTenantDirectory {
    async fn find_staff(&self, id: &StaffId) -> Result<Option<Staff>, DomainError> {
        let row: Option<StaffRow> = sqlx::query_as(
            r#"
            SELECT id, organization_id, name, email, designation, is_verified
            FROM staff
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load staff: {}", e)))?;

        Ok(row.map(Staff::from))
    }

    async fn find_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, DomainError> {
        let row: Option<OrganizationRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, phone, address, region, country, is_gst_registered,
                   gstin, is_email_verified, is_blocked, created_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load organization: {}", e)))?;

        Ok(row.map(Organization::from))
    }

    async fn find_preferences(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<SystemPreference>, DomainError> {
        let row: Option<PreferenceRow> = sqlx::query_as(
            r#"
            SELECT organization_id, language, date_format, time_zone, currency, theme,
                   is_setup_complete
            FROM system_preferences
            WHERE organization_id = $1
            "#,
        )
        .bind(organization_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load preferences: {}", e)))?;

        Ok(row.map(SystemPreference::from))
    }
}
