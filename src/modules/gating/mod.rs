//! Presentational gates over already-resolved permissions.

pub mod model;
pub mod service;

pub use model::{ButtonState, GateDecision, MatchMode, PermissionSource};
pub use service::{ConditionalRender, DEFAULT_DENIED_TOOLTIP, PermissionButton, PermissionGuard};
