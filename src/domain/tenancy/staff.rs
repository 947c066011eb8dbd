//! Staff member entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrganizationId, StaffId};

/// A staff member. Bearer tokens identify staff; billing acts on the
/// staff member's organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub email: String,
    pub designation: Option<String>,
    pub is_verified: bool,
}

impl Staff {
    pub fn new(
        id: StaffId,
        organization_id: OrganizationId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            organization_id,
            name: name.into(),
            email: email.into(),
            designation: None,
            is_verified: false,
        }
    }
}
