//! HTTP middleware for axum.
//!
//! - `access_gate` - Session token validation and entitlement resolution
//! - `admin_key` - Shared-key guard for operator endpoints

pub mod access_gate;
pub mod admin_key;

pub use access_gate::{access_gate, extract_session_token, AccessRejection, RequireAccess};
pub use admin_key::{require_admin_key, ADMIN_KEY_HEADER};
