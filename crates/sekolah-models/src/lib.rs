//! # Sekolah Models
//!
//! Wire models for the permission-override endpoints of the Sekolah backend.
//!
//! - [`overrides`]: override records, targets, request DTOs and list envelopes
//! - [`ids`]: the `OverrideId` newtype
//!
//! Records coming from the backend are decoded with [`Override::from_value`],
//! which rejects anything that does not have the four-boolean shape or names
//! an unknown target.

pub mod ids;
pub mod overrides;
pub mod serde;

pub use ids::OverrideId;
pub use overrides::{
    CreateOverrideDto, MessageResponse, Override, OverrideFilterParams, OverrideListResponse,
    OverrideTarget, TargetType, UpdateOverrideDto, validate_resource_key,
};
