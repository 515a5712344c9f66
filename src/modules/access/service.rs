use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use sekolah_client::{OverrideStore, fetch_merged_overrides};
use sekolah_core::{Action, Permission, Role};
use tracing::{debug, instrument, warn};

use super::model::AccessNotice;
use crate::modules::menu::{Menu, MenuResource};

/// Effective permission of `role` on `resource_key`: the override if one
/// exists, else the resource's static base for the role, else `fallback`.
pub fn get_effective_permission(
    menu: &Menu,
    overrides: &HashMap<String, Permission>,
    role: Role,
    resource_key: &str,
    fallback: Permission,
) -> Permission {
    overrides
        .get(resource_key)
        .copied()
        .unwrap_or_else(|| menu.base_permission(role, resource_key, fallback))
}

/// Resolved permissions of one role (and optionally one user) over the menu.
///
/// The role is always passed in; nothing is read from ambient state.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    menu: Arc<Menu>,
    role: Role,
    fallback: Permission,
    overrides: HashMap<String, Permission>,
    notice: Option<AccessNotice>,
}

impl PermissionResolver {
    /// Resolver over static base permissions only.
    pub fn new(menu: Arc<Menu>, role: Role, fallback: Permission) -> Self {
        Self {
            menu,
            role,
            fallback,
            overrides: HashMap::new(),
            notice: None,
        }
    }

    /// Install overrides, dropping keys that are not in the menu.
    pub fn with_overrides(mut self, overrides: HashMap<String, Permission>) -> Self {
        let (known, stale): (HashMap<_, _>, HashMap<_, _>) = overrides
            .into_iter()
            .partition(|(key, _)| self.menu.contains_key(key));

        if !stale.is_empty() {
            let mut keys: Vec<&str> = stale.keys().map(String::as_str).collect();
            keys.sort_unstable();
            warn!(
                role = %self.role,
                stale_keys = ?keys,
                "Ignoring overrides for resources missing from the menu"
            );
        }

        self.overrides = known;
        self
    }

    /// Load overrides for `role` (and `user_id`, which wins over the role) and
    /// build a resolver. Never fails: when the store is unreachable the
    /// resolver uses static permissions and carries an [`AccessNotice`].
    #[instrument(skip(store, menu))]
    pub async fn load<S>(
        store: &S,
        menu: Arc<Menu>,
        role: Role,
        user_id: Option<&str>,
        fallback: Permission,
    ) -> Self
    where
        S: OverrideStore + ?Sized,
    {
        let resolver = Self::new(menu, role, fallback);
        match fetch_merged_overrides(store, Some(role), user_id).await {
            Ok(overrides) => {
                debug!(count = overrides.len(), "Loaded permission overrides");
                resolver.with_overrides(overrides)
            }
            Err(e) => {
                warn!(error = %e, "Falling back to static permissions");
                Self {
                    notice: Some(AccessNotice::overrides_unavailable(&e)),
                    ..resolver
                }
            }
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn fallback(&self) -> Permission {
        self.fallback
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn notice(&self) -> Option<&AccessNotice> {
        self.notice.as_ref()
    }

    pub fn overrides(&self) -> &HashMap<String, Permission> {
        &self.overrides
    }

    pub fn base_permission(&self, resource_key: &str) -> Permission {
        self.menu
            .base_permission(self.role, resource_key, self.fallback)
    }

    pub fn effective_permission(&self, resource_key: &str) -> Permission {
        get_effective_permission(
            &self.menu,
            &self.overrides,
            self.role,
            resource_key,
            self.fallback,
        )
    }

    pub fn is_overridden(&self, resource_key: &str) -> bool {
        self.overrides.contains_key(resource_key)
    }

    pub fn can(&self, resource_key: &str, action: Action) -> bool {
        self.effective_permission(resource_key).allows(action)
    }

    /// Effective permission of every gated resource, keyed by resource key.
    pub fn effective_map(&self) -> BTreeMap<String, Permission> {
        self.menu
            .resource_keys()
            .map(|key| (key.to_string(), self.effective_permission(key)))
            .collect()
    }

    /// The menu as this role sees it: items without `view` are removed and
    /// groups left without children disappear.
    pub fn visible_menu(&self) -> Vec<MenuResource> {
        self.menu
            .items()
            .iter()
            .filter_map(|node| {
                if let Some(key) = &node.resource_key {
                    return self.can(key, Action::View).then(|| node.clone());
                }
                let children: Vec<MenuResource> = node
                    .children
                    .iter()
                    .filter(|child| match &child.resource_key {
                        Some(key) => self.can(key, Action::View),
                        None => true,
                    })
                    .cloned()
                    .collect();
                (!children.is_empty()).then(|| MenuResource {
                    children,
                    ..node.clone()
                })
            })
            .collect()
    }
}
