use sekolah_client::ClientError;
use sekolah_core::{AccessLevel, Permission};
use sekolah_models::{CreateOverrideDto, Override, OverrideId, UpdateOverrideDto};
use serde::Serialize;

/// One line of the override matrix shown to an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideRow {
    pub resource_key: String,
    pub label: String,
    pub group: Option<String>,
    /// Static base permission for the edited target.
    pub base: Permission,
    /// Persisted override, if any.
    pub saved: Option<Permission>,
    /// Staged but unsaved selection, if any.
    pub pending: Option<Permission>,
    /// What the row shows: pending, else saved, else base.
    pub current: Permission,
    pub level: AccessLevel,
}

impl OverrideRow {
    pub fn is_overridden(&self) -> bool {
        self.saved.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }
}

/// The network call needed to bring one resource in line with its staged value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedWrite {
    Create(CreateOverrideDto),
    Update(OverrideId, UpdateOverrideDto),
    Delete(OverrideId),
    Nothing,
}

/// What happened to one resource during a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(Override),
    Updated(Override),
    Deleted,
    Unchanged,
}

impl SaveOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SaveOutcome::Created(_) => "created",
            SaveOutcome::Updated(_) => "updated",
            SaveOutcome::Deleted => "deleted",
            SaveOutcome::Unchanged => "unchanged",
        }
    }
}

#[derive(Debug)]
pub struct ResourceSaveResult {
    pub resource_key: String,
    pub result: Result<SaveOutcome, ClientError>,
}

/// Per-resource results of one save. Writes are independent: a failure for
/// one key does not undo the others.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub results: Vec<ResourceSaveResult>,
}

impl SaveReport {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.result.is_ok())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &SaveOutcome)> + '_ {
        self.results.iter().filter_map(|r| match &r.result {
            Ok(outcome) => Some((r.resource_key.as_str(), outcome)),
            Err(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &ClientError)> + '_ {
        self.results.iter().filter_map(|r| match &r.result {
            Ok(_) => None,
            Err(e) => Some((r.resource_key.as_str(), e)),
        })
    }

    pub fn failed_keys(&self) -> Vec<&str> {
        self.failed().map(|(key, _)| key).collect()
    }

    pub fn outcome(&self, resource_key: &str) -> Option<&Result<SaveOutcome, ClientError>> {
        self.results
            .iter()
            .find(|r| r.resource_key == resource_key)
            .map(|r| &r.result)
    }
}
