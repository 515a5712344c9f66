use sekolah_core::{Permission, Role, RolePermissionMap, get_user_permission};
use serde::{Deserialize, Serialize};

use crate::modules::access::PermissionResolver;

/// Where a gate gets its permission from. All variants are already resolved
/// or resolvable locally; gates never touch the network.
#[derive(Debug, Clone, Copy)]
pub enum PermissionSource<'a> {
    /// A permission computed elsewhere.
    Resolved(Permission),
    /// A role looked up in a resource's static map.
    Map {
        role: Role,
        map: &'a RolePermissionMap,
        fallback: Permission,
    },
    /// A resource's effective permission, overrides included.
    Resource {
        resolver: &'a PermissionResolver,
        resource_key: &'a str,
    },
}

impl<'a> PermissionSource<'a> {
    pub fn map(role: Role, map: &'a RolePermissionMap, fallback: Permission) -> Self {
        PermissionSource::Map {
            role,
            map,
            fallback,
        }
    }

    pub fn resource(resolver: &'a PermissionResolver, resource_key: &'a str) -> Self {
        PermissionSource::Resource {
            resolver,
            resource_key,
        }
    }

    pub fn resolve(&self) -> Permission {
        match self {
            PermissionSource::Resolved(permission) => *permission,
            PermissionSource::Map {
                role,
                map,
                fallback,
            } => get_user_permission(*role, map, *fallback),
            PermissionSource::Resource {
                resolver,
                resource_key,
            } => resolver.effective_permission(resource_key),
        }
    }
}

impl From<Permission> for PermissionSource<'_> {
    fn from(permission: Permission) -> Self {
        PermissionSource::Resolved(permission)
    }
}

/// What a gate tells the view to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Render the children.
    Render,
    /// Render the fallback content instead of the children.
    Fallback,
    /// Render the children in a disabled state.
    Disabled,
    /// Render nothing.
    Hidden,
}

impl GateDecision {
    pub fn is_rendered(&self) -> bool {
        !matches!(self, GateDecision::Hidden)
    }
}

/// How several required actions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    All,
    Any,
}

/// Render state of a permission-aware button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonState {
    pub visible: bool,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}
