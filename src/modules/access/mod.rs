//! Effective-permission resolution: overrides over static base permissions.

pub mod model;
pub mod service;

pub use model::AccessNotice;
pub use service::{PermissionResolver, get_effective_permission};
