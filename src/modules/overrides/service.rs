use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::anyhow;
use futures::future::join_all;
use sekolah_client::{ClientError, OverrideStore, index_by_resource};
use sekolah_core::{AccessLevel, AppError, Permission, Role};
use sekolah_models::{CreateOverrideDto, Override, OverrideTarget};
use tracing::{info, instrument, warn};

use super::model::{OverrideRow, PlannedWrite, ResourceSaveResult, SaveOutcome, SaveReport};
use crate::modules::menu::Menu;

/// Staged editing of one target's overrides.
///
/// Selections are held in a pending map and only written on [`save`](Self::save).
/// [`refresh`](Self::refresh) throws pending changes away and reloads. There is
/// no locking against other admins: the last write wins.
///
/// Every network call happens inside a future borrowed from `&mut self`; if
/// the caller drops that future the editor is left exactly as it was.
pub struct OverrideEditor<S> {
    store: S,
    menu: Arc<Menu>,
    target: OverrideTarget,
    base_role: Role,
    fallback: Permission,
    saved: HashMap<String, Override>,
    pending: BTreeMap<String, Permission>,
}

impl<S> std::fmt::Debug for OverrideEditor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideEditor")
            .field("target", &self.target)
            .field("base_role", &self.base_role)
            .field("saved", &self.saved.len())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<S: OverrideStore> OverrideEditor<S> {
    /// `base_role` is the role whose static permissions count as the base;
    /// for a user target it is that user's role.
    pub fn new(
        store: S,
        menu: Arc<Menu>,
        target: OverrideTarget,
        base_role: Role,
        fallback: Permission,
    ) -> Self {
        Self {
            store,
            menu,
            target,
            base_role,
            fallback,
            saved: HashMap::new(),
            pending: BTreeMap::new(),
        }
    }

    pub fn for_role(store: S, menu: Arc<Menu>, role: Role, fallback: Permission) -> Self {
        Self::new(store, menu, OverrideTarget::Role(role), role, fallback)
    }

    pub fn for_user(
        store: S,
        menu: Arc<Menu>,
        user_id: impl Into<String>,
        user_role: Role,
        fallback: Permission,
    ) -> Self {
        Self::new(store, menu, OverrideTarget::user(user_id), user_role, fallback)
    }

    pub fn target(&self) -> &OverrideTarget {
        &self.target
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Discard pending changes and reload persisted overrides.
    #[instrument(skip(self), fields(override_target = %self.target))]
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let records = self.store.list(&self.target).await?;
        let mut saved = index_by_resource(records);
        saved.retain(|key, record| {
            let known = self.menu.contains_key(key);
            if !known {
                warn!(
                    resource_key = %key,
                    override_id = %record.id,
                    "Override refers to a resource missing from the menu"
                );
            }
            known
        });

        self.saved = saved;
        self.pending.clear();
        Ok(())
    }

    fn ensure_known(&self, resource_key: &str) -> Result<(), AppError> {
        if self.menu.contains_key(resource_key) {
            Ok(())
        } else {
            Err(AppError::not_found(anyhow!(
                "Unknown resource: {}",
                resource_key
            )))
        }
    }

    pub fn base(&self, resource_key: &str) -> Permission {
        self.menu
            .base_permission(self.base_role, resource_key, self.fallback)
    }

    pub fn saved(&self, resource_key: &str) -> Option<&Override> {
        self.saved.get(resource_key)
    }

    /// Persisted value: the override if present, else the base.
    pub fn committed(&self, resource_key: &str) -> Permission {
        self.saved
            .get(resource_key)
            .map(Override::permission)
            .unwrap_or_else(|| self.base(resource_key))
    }

    pub fn current(&self, resource_key: &str) -> Permission {
        self.pending
            .get(resource_key)
            .copied()
            .unwrap_or_else(|| self.committed(resource_key))
    }

    pub fn level(&self, resource_key: &str) -> AccessLevel {
        AccessLevel::from_permission(&self.current(resource_key))
    }

    /// Stage an arbitrary permission. A value that needs no write clears the
    /// pending entry instead. A saved override equal to the base stays staged
    /// so that saving deletes it.
    pub fn stage_permission(
        &mut self,
        resource_key: &str,
        permission: Permission,
    ) -> Result<(), AppError> {
        self.ensure_known(resource_key)?;
        if self.plan(resource_key, permission) == PlannedWrite::Nothing {
            self.pending.remove(resource_key);
        } else {
            self.pending.insert(resource_key.to_string(), permission);
        }
        Ok(())
    }

    /// Stage one of the named levels. `Custom` cannot be selected.
    pub fn stage_level(&mut self, resource_key: &str, level: AccessLevel) -> Result<(), AppError> {
        let permission = level.permission().ok_or_else(|| {
            AppError::bad_request(anyhow!("Access level '{}' cannot be selected", level))
        })?;
        self.stage_permission(resource_key, permission)
    }

    /// Stage the base permission, which removes any override on save.
    pub fn stage_reset(&mut self, resource_key: &str) -> Result<(), AppError> {
        let base = self.base(resource_key);
        self.stage_permission(resource_key, base)
    }

    pub fn discard(&mut self, resource_key: &str) {
        self.pending.remove(resource_key);
    }

    pub fn discard_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self) -> &BTreeMap<String, Permission> {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn rows(&self) -> Vec<OverrideRow> {
        self.menu
            .resources()
            .filter_map(|resource| {
                let key = resource.resource_key.as_deref()?;
                let current = self.current(key);
                Some(OverrideRow {
                    resource_key: key.to_string(),
                    label: resource.label.clone(),
                    group: self.menu.group_of(key).map(str::to_string),
                    base: self.base(key),
                    saved: self.saved.get(key).map(Override::permission),
                    pending: self.pending.get(key).copied(),
                    current,
                    level: AccessLevel::from_permission(&current),
                })
            })
            .collect()
    }

    /// Decide the write for one staged value: equal to base removes the
    /// override, anything else creates or updates it.
    pub fn plan(&self, resource_key: &str, staged: Permission) -> PlannedWrite {
        let base = self.base(resource_key);
        match self.saved.get(resource_key) {
            Some(existing) if staged == base => PlannedWrite::Delete(existing.id),
            None if staged == base => PlannedWrite::Nothing,
            Some(existing) if existing.permission() == staged => PlannedWrite::Nothing,
            Some(existing) => PlannedWrite::Update(existing.id, staged.into()),
            None => PlannedWrite::Create(CreateOverrideDto::new(
                &self.target,
                resource_key,
                staged,
            )),
        }
    }

    /// Write every pending change as an independent request, all in flight at
    /// once. Keys that fail stay pending; the rest are committed locally.
    #[instrument(skip(self), fields(override_target = %self.target, pending = self.pending.len()))]
    pub async fn save(&mut self) -> SaveReport {
        let plans: Vec<(String, PlannedWrite)> = self
            .pending
            .iter()
            .map(|(key, staged)| (key.clone(), self.plan(key, *staged)))
            .collect();

        let store = &self.store;
        let target = &self.target;
        let results = join_all(plans.into_iter().map(|(key, plan)| async move {
            let result = execute(store, target, &key, plan).await;
            ResourceSaveResult {
                resource_key: key,
                result,
            }
        }))
        .await;

        for item in &results {
            match &item.result {
                Ok(outcome) => {
                    match outcome {
                        SaveOutcome::Created(record) | SaveOutcome::Updated(record) => {
                            self.saved.insert(item.resource_key.clone(), record.clone());
                        }
                        SaveOutcome::Deleted => {
                            self.saved.remove(&item.resource_key);
                        }
                        SaveOutcome::Unchanged => {}
                    }
                    self.pending.remove(&item.resource_key);
                }
                Err(e) => warn!(
                    resource_key = %item.resource_key,
                    error = %e,
                    "Failed to save permission override"
                ),
            }
        }

        let report = SaveReport { results };
        info!(
            saved = report.succeeded().count(),
            failed = report.failed().count(),
            "Permission overrides saved"
        );
        report
    }
}

/// Perform one planned write. Races with other admins resolve as last write
/// wins: a create that collides becomes an update, an update of a vanished
/// record becomes a create and a delete of a vanished record is already done.
async fn execute<S: OverrideStore + ?Sized>(
    store: &S,
    target: &OverrideTarget,
    resource_key: &str,
    plan: PlannedWrite,
) -> Result<SaveOutcome, ClientError> {
    match plan {
        PlannedWrite::Nothing => Ok(SaveOutcome::Unchanged),
        PlannedWrite::Create(dto) => match store.create(&dto).await {
            Ok(record) => Ok(SaveOutcome::Created(record)),
            Err(ClientError::Conflict(_)) => {
                let existing = store
                    .list(target)
                    .await?
                    .into_iter()
                    .find(|r| r.resource_key == resource_key)
                    .ok_or_else(|| {
                        ClientError::Conflict(format!(
                            "Override for {} on {} conflicts but cannot be found",
                            target, resource_key
                        ))
                    })?;
                let record = store.update(existing.id, &dto.permission().into()).await?;
                Ok(SaveOutcome::Updated(record))
            }
            Err(e) => Err(e),
        },
        PlannedWrite::Update(id, dto) => match store.update(id, &dto).await {
            Ok(record) => Ok(SaveOutcome::Updated(record)),
            Err(ClientError::NotFound(_)) => {
                let create = CreateOverrideDto::new(target, resource_key, dto.permission());
                let record = store.create(&create).await?;
                Ok(SaveOutcome::Created(record))
            }
            Err(e) => Err(e),
        },
        PlannedWrite::Delete(id) => match store.delete(id).await {
            Ok(()) | Err(ClientError::NotFound(_)) => Ok(SaveOutcome::Deleted),
            Err(e) => Err(e),
        },
    }
}
