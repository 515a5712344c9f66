//! Permission primitives, presets and role-permission maps.
//!
//! A [`Permission`] is four independent capabilities on one resource. Resources
//! declare their base permissions as a [`RolePermissionMap`], built from the
//! presets with [`create_permission_for_roles`] and combined with
//! [`merge_permissions`]. [`get_user_permission`] resolves one role against a
//! map and always takes the fallback explicitly.
//!
//! # Example
//!
//! ```
//! use sekolah_core::permissions::{
//!     FULL_PERMISSIONS, NONE, READ_ONLY_PERMISSIONS, create_permission_for_roles,
//!     get_user_permission, merge_permissions,
//! };
//! use sekolah_core::Role;
//!
//! // Full for admins and the principal, then read-only for the principal.
//! // Later maps win, so the principal ends up read-only.
//! let map = merge_permissions([
//!     &create_permission_for_roles(&[Role::Admin, Role::KepalaSekolah], FULL_PERMISSIONS),
//!     &create_permission_for_roles(&[Role::KepalaSekolah], READ_ONLY_PERMISSIONS),
//! ]);
//!
//! assert_eq!(get_user_permission(Role::KepalaSekolah, &map, NONE), READ_ONLY_PERMISSIONS);
//! assert_eq!(get_user_permission(Role::Siswa, &map, NONE), NONE);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::roles::Role;

// =============================================================================
// Actions
// =============================================================================

/// One capability that can be requested against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" | "read" => Ok(Action::View),
            "create" | "add" => Ok(Action::Create),
            "edit" | "update" => Ok(Action::Edit),
            "delete" | "remove" => Ok(Action::Delete),
            _ => Err(AppError::bad_request(anyhow!("Unknown action: {}", s))),
        }
    }
}

// =============================================================================
// Permission
// =============================================================================

/// Four independent capabilities on a single resource.
///
/// Equality is structural. Values are replaced, never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Permission {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Permission {
    pub const fn new(view: bool, create: bool, edit: bool, delete: bool) -> Self {
        Self {
            view,
            create,
            edit,
            delete,
        }
    }

    pub const fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
        }
    }

    /// True when every action is allowed. An empty slice is vacuously allowed.
    pub fn allows_all(&self, actions: &[Action]) -> bool {
        actions.iter().all(|a| self.allows(*a))
    }

    /// True when at least one action is allowed. An empty slice is never allowed.
    pub fn allows_any(&self, actions: &[Action]) -> bool {
        actions.iter().any(|a| self.allows(*a))
    }

    pub fn granted_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.allows(*a))
            .collect()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |on: bool, c: char| if on { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            flag(self.view, 'v'),
            flag(self.create, 'c'),
            flag(self.edit, 'e'),
            flag(self.delete, 'd')
        )
    }
}

// =============================================================================
// Presets
// =============================================================================

/// All four capabilities.
pub const FULL_PERMISSIONS: Permission = Permission::new(true, true, true, true);
/// View only.
pub const READ_ONLY_PERMISSIONS: Permission = Permission::new(true, false, false, false);
/// View and edit.
pub const VIEW_EDIT_PERMISSIONS: Permission = Permission::new(true, false, true, false);
/// View and create.
pub const VIEW_CREATE_PERMISSIONS: Permission = Permission::new(true, true, false, false);
/// No access.
pub const NONE: Permission = Permission::new(false, false, false, false);

// =============================================================================
// Role-permission maps
// =============================================================================

/// Base permission per role for one resource.
///
/// A role absent from the map has no defined permission; callers of
/// [`get_user_permission`] decide what that means through its fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolePermissionMap(BTreeMap<Role, Permission>);

impl RolePermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: Role) -> Option<Permission> {
        self.0.get(&role).copied()
    }

    pub fn contains_role(&self, role: Role) -> bool {
        self.0.contains_key(&role)
    }

    /// Returns a copy of the map with `role` set to `permission`.
    pub fn with(mut self, role: Role, permission: Permission) -> Self {
        self.0.insert(role, permission);
        self
    }

    /// Key-wise union where `other` wins on shared roles.
    pub fn merge(mut self, other: &RolePermissionMap) -> Self {
        self.0.extend(other.iter());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, Permission)> + '_ {
        self.0.iter().map(|(r, p)| (*r, *p))
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Role, Permission)> for RolePermissionMap {
    fn from_iter<I: IntoIterator<Item = (Role, Permission)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Assign `permission` to every role in `roles`. Unlisted roles stay absent.
pub fn create_permission_for_roles(roles: &[Role], permission: Permission) -> RolePermissionMap {
    roles.iter().map(|role| (*role, permission)).collect()
}

/// Left-to-right fold of [`RolePermissionMap::merge`]: for a role present in
/// several maps, the last one wins. Merging nothing yields an empty map.
pub fn merge_permissions<'a, I>(maps: I) -> RolePermissionMap
where
    I: IntoIterator<Item = &'a RolePermissionMap>,
{
    maps.into_iter()
        .fold(RolePermissionMap::new(), |acc, map| acc.merge(map))
}

/// The permission `role` holds in `map`, or `fallback` when the role is not listed.
pub fn get_user_permission(role: Role, map: &RolePermissionMap, fallback: Permission) -> Permission {
    map.get(role).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_full_principal_read() -> RolePermissionMap {
        merge_permissions([
            &create_permission_for_roles(&[Role::Admin], FULL_PERMISSIONS),
            &create_permission_for_roles(&[Role::KepalaSekolah], READ_ONLY_PERMISSIONS),
        ])
    }

    #[test]
    fn test_presets() {
        assert_eq!(FULL_PERMISSIONS.granted_actions(), Action::ALL.to_vec());
        assert_eq!(READ_ONLY_PERMISSIONS.granted_actions(), vec![Action::View]);
        assert_eq!(
            VIEW_EDIT_PERMISSIONS.granted_actions(),
            vec![Action::View, Action::Edit]
        );
        assert_eq!(
            VIEW_CREATE_PERMISSIONS.granted_actions(),
            vec![Action::View, Action::Create]
        );
        assert!(NONE.granted_actions().is_empty());
        assert_eq!(Permission::default(), NONE);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Permission::new(true, false, true, false), VIEW_EDIT_PERMISSIONS);
        assert_ne!(VIEW_EDIT_PERMISSIONS, VIEW_CREATE_PERMISSIONS);
    }

    #[test]
    fn test_allows_all_and_any() {
        let p = VIEW_EDIT_PERMISSIONS;
        assert!(p.allows_all(&[Action::View, Action::Edit]));
        assert!(!p.allows_all(&[Action::View, Action::Delete]));
        assert!(p.allows_any(&[Action::Delete, Action::Edit]));
        assert!(!p.allows_any(&[Action::Create, Action::Delete]));
        assert!(p.allows_all(&[]));
        assert!(!p.allows_any(&[]));
    }

    #[test]
    fn test_edit_without_view_is_representable() {
        let p = Permission::new(false, false, true, false);
        assert!(p.allows(Action::Edit));
        assert!(!p.allows(Action::View));
    }

    #[test]
    fn test_create_permission_for_roles() {
        let map = create_permission_for_roles(&[Role::Guru, Role::Admin], VIEW_EDIT_PERMISSIONS);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(Role::Guru), Some(VIEW_EDIT_PERMISSIONS));
        assert!(!map.contains_role(Role::Siswa));
    }

    #[test]
    fn test_create_permission_for_no_roles_is_empty() {
        for preset in [FULL_PERMISSIONS, READ_ONLY_PERMISSIONS, NONE] {
            assert!(create_permission_for_roles(&[], preset).is_empty());
        }
    }

    #[test]
    fn test_merge_with_empty_is_identity() {
        let a = admin_full_principal_read();
        assert_eq!(merge_permissions([&a, &RolePermissionMap::new()]), a);
        assert_eq!(merge_permissions([&RolePermissionMap::new(), &a]), a);
        assert!(merge_permissions(Vec::<&RolePermissionMap>::new()).is_empty());
    }

    #[test]
    fn test_merge_later_argument_wins() {
        let a = create_permission_for_roles(&[Role::Admin, Role::Guru], FULL_PERMISSIONS);
        let b = create_permission_for_roles(&[Role::Guru], READ_ONLY_PERMISSIONS);
        let c = create_permission_for_roles(&[Role::Guru], VIEW_CREATE_PERMISSIONS);

        let merged = merge_permissions([&a, &b]);
        assert_eq!(merged.get(Role::Guru), Some(READ_ONLY_PERMISSIONS));
        assert_eq!(merged.get(Role::Admin), Some(FULL_PERMISSIONS));

        let merged = merge_permissions([&a, &b, &c]);
        assert_eq!(merged.get(Role::Guru), Some(VIEW_CREATE_PERMISSIONS));

        let merged = merge_permissions([&b, &a]);
        assert_eq!(merged.get(Role::Guru), Some(FULL_PERMISSIONS));
    }

    #[test]
    fn test_get_user_permission_uses_explicit_fallback() {
        let map = admin_full_principal_read();
        assert_eq!(get_user_permission(Role::Admin, &map, NONE), FULL_PERMISSIONS);
        assert_eq!(get_user_permission(Role::Siswa, &map, NONE), NONE);
        assert_eq!(
            get_user_permission(Role::Siswa, &map, READ_ONLY_PERMISSIONS),
            READ_ONLY_PERMISSIONS
        );
    }

    #[test]
    fn test_listed_none_beats_fallback() {
        let map = create_permission_for_roles(&[Role::Siswa], NONE);
        assert_eq!(get_user_permission(Role::Siswa, &map, FULL_PERMISSIONS), NONE);
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("VIEW".parse::<Action>().unwrap(), Action::View);
        assert_eq!("update".parse::<Action>().unwrap(), Action::Edit);
        assert!("approve".parse::<Action>().is_err());
    }

    #[test]
    fn test_permission_display() {
        assert_eq!(FULL_PERMISSIONS.to_string(), "vced");
        assert_eq!(VIEW_EDIT_PERMISSIONS.to_string(), "v-e-");
        assert_eq!(NONE.to_string(), "----");
    }

    #[test]
    fn test_map_serializes_with_role_keys() {
        let map = create_permission_for_roles(&[Role::Guru], READ_ONLY_PERMISSIONS);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Guru": { "view": true, "create": false, "edit": false, "delete": false }
            })
        );
        let back: RolePermissionMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_permission_requires_all_fields() {
        let partial = serde_json::json!({ "view": true, "create": false });
        assert!(serde_json::from_value::<Permission>(partial).is_err());
    }
}
