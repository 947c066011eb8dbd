//! Organization aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrganizationId, Timestamp};

/// A tenant organization. Subscriptions are bought by and for organizations.
///
/// Invoice rendering reads the contact fields; the access gate reads
/// `is_blocked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub is_gst_registered: bool,
    pub gstin: Option<String>,
    pub is_email_verified: bool,
    /// Administrative block; a blocked organization is denied all gated access.
    pub is_blocked: bool,
    pub created_at: Timestamp,
}

impl Organization {
    /// Creates an unblocked organization with only the required fields set.
    pub fn new(id: OrganizationId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
            region: None,
            country: None,
            is_gst_registered: false,
            gstin: None,
            is_email_verified: false,
            is_blocked: false,
            created_at: Timestamp::now(),
        }
    }

    /// Address, region and country joined for display, skipping blanks.
    pub fn postal_address(&self) -> String {
        [&self.address, &self.region, &self.country]
            .iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
