pub mod access;
pub mod gating;
pub mod menu;
pub mod overrides;

pub use self::access::{AccessNotice, PermissionResolver, get_effective_permission};
pub use self::menu::{Menu, MenuResource, school_menu};
pub use self::overrides::{OverrideEditor, SaveReport};
