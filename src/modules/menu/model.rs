use std::collections::HashSet;

use anyhow::anyhow;
use sekolah_core::{AppError, Permission, Role, RolePermissionMap, get_user_permission};
use serde::Serialize;

/// A node of the static menu tree.
///
/// Groups carry a label and children; items carry a `resource_key` and base
/// permissions. A node without a `resource_key` is not permission-gated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuResource {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub permissions: RolePermissionMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuResource>,
}

impl MenuResource {
    pub fn group(label: impl Into<String>, children: Vec<MenuResource>) -> Self {
        Self {
            label: label.into(),
            resource_key: None,
            path: None,
            permissions: RolePermissionMap::new(),
            children,
        }
    }

    pub fn item(
        label: impl Into<String>,
        resource_key: impl Into<String>,
        permissions: RolePermissionMap,
    ) -> Self {
        let resource_key = resource_key.into();
        Self {
            label: label.into(),
            path: Some(format!("/{}", resource_key.replace('_', "-"))),
            resource_key: Some(resource_key),
            permissions,
            children: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn is_gated(&self) -> bool {
        self.resource_key.is_some()
    }
}

/// The whole menu: top-level items and groups of items, one level deep.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Menu {
    items: Vec<MenuResource>,
}

impl Menu {
    pub fn new(items: Vec<MenuResource>) -> Self {
        Self { items }
    }

    /// Like [`Menu::new`] but rejects menus that break the tree's shape.
    pub fn try_new(items: Vec<MenuResource>) -> Result<Self, AppError> {
        let menu = Self::new(items);
        menu.validate()?;
        Ok(menu)
    }

    /// Resource keys are unique and children do not nest further.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for node in &self.items {
            for child in &node.children {
                if !child.children.is_empty() {
                    return Err(AppError::unprocessable(anyhow!(
                        "Menu item '{}' nests deeper than one level",
                        child.label
                    )));
                }
            }
            for resource in std::iter::once(node).chain(node.children.iter()) {
                if let Some(key) = &resource.resource_key {
                    if !seen.insert(key.as_str()) {
                        return Err(AppError::unprocessable(anyhow!(
                            "Duplicate resource key '{}' in menu",
                            key
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn items(&self) -> &[MenuResource] {
        &self.items
    }

    /// Every gated node, groups before their children, in menu order.
    pub fn resources(&self) -> impl Iterator<Item = &MenuResource> + '_ {
        self.items
            .iter()
            .flat_map(|node| std::iter::once(node).chain(node.children.iter()))
            .filter(|node| node.is_gated())
    }

    pub fn resource_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.resources().filter_map(|r| r.resource_key.as_deref())
    }

    pub fn find(&self, resource_key: &str) -> Option<&MenuResource> {
        self.resources()
            .find(|r| r.resource_key.as_deref() == Some(resource_key))
    }

    pub fn contains_key(&self, resource_key: &str) -> bool {
        self.find(resource_key).is_some()
    }

    /// Label of the group a resource sits in, if any.
    pub fn group_of(&self, resource_key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|group| {
                group
                    .children
                    .iter()
                    .any(|c| c.resource_key.as_deref() == Some(resource_key))
            })
            .map(|group| group.label.as_str())
    }

    /// Static base permission of `role` on a resource. Unknown resources and
    /// unlisted roles both resolve to `fallback`.
    pub fn base_permission(&self, role: Role, resource_key: &str, fallback: Permission) -> Permission {
        match self.find(resource_key) {
            Some(resource) => get_user_permission(role, &resource.permissions, fallback),
            None => fallback,
        }
    }
}
