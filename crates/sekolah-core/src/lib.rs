//! # Sekolah Core
//!
//! Permission primitives shared by every Sekolah crate:
//!
//! - [`permissions`]: the `Permission` value type, presets, role-permission maps,
//!   map builder/merge and the role resolver
//! - [`roles`]: the closed `Role` enumeration
//! - [`access_level`]: discrete access levels derived from presets
//! - [`errors`]: application error type with HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use sekolah_core::{AccessLevel, Role, get_user_permission, NONE};
//!
//! let permission = get_user_permission(Role::Guru, &resource.permissions, NONE);
//! println!("{}", AccessLevel::from(permission).label());
//! ```

pub mod access_level;
pub mod errors;
pub mod permissions;
pub mod roles;

// Re-export commonly used types at crate root
pub use access_level::AccessLevel;
pub use errors::AppError;
pub use permissions::{
    Action, FULL_PERMISSIONS, NONE, Permission, READ_ONLY_PERMISSIONS, RolePermissionMap,
    VIEW_CREATE_PERMISSIONS, VIEW_EDIT_PERMISSIONS, create_permission_for_roles,
    get_user_permission, merge_permissions,
};
pub use roles::Role;
