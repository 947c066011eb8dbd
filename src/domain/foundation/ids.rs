//! Strongly-typed identifier value objects.
//!
//! Every aggregate in the billing domain is keyed by a UUID. The newtypes
//! keep an organization id from ever being passed where a plan id belongs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the raw 16 bytes of the identifier.
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            /// Rebuilds an identifier from its raw 16 bytes.
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a tenant organization.
    OrganizationId
);

uuid_id!(
    /// Unique identifier for a staff member (the authenticated user).
    StaffId
);

uuid_id!(
    /// Unique identifier for a subscription plan in the catalog.
    PlanId
);

uuid_id!(
    /// Unique identifier for a plan payment record.
    PlanPaymentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(PlanPaymentId::new(), PlanPaymentId::new());
    }

    #[test]
    fn id_parses_from_its_display_form() {
        let id = OrganizationId::new();
        let parsed: OrganizationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn id_rejects_garbage() {
        assert!("not-a-uuid".parse::<PlanId>().is_err());
    }

    #[test]
    fn id_survives_byte_conversion() {
        let id = PlanPaymentId::new();
        assert_eq!(PlanPaymentId::from_bytes(*id.as_bytes()), id);
    }

    #[test]
    fn id_serializes_as_bare_uuid_string() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&StaffId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
