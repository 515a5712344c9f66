//! In-process [`OverrideStore`] with the backend's uniqueness rules.
//!
//! Used by the mock backend and by tests. Failures can be injected per
//! resource key (writes) or globally (listing).

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sekolah_models::{CreateOverrideDto, Override, OverrideId, OverrideTarget, UpdateOverrideDto};
use tracing::debug;

use crate::error::ClientError;
use crate::store::OverrideStore;

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    records: Vec<Override>,
    failing_keys: HashSet<String>,
    list_unavailable: bool,
}

#[derive(Debug, Default)]
pub struct InMemoryOverrideStore {
    state: Mutex<State>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-write; the data is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every write touching `resource_key` fail with a server error.
    pub fn fail_writes_for(&self, resource_key: impl Into<String>) {
        self.lock().failing_keys.insert(resource_key.into());
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.failing_keys.clear();
        state.list_unavailable = false;
    }

    /// Make `list` fail as if the backend were down.
    pub fn set_list_unavailable(&self, unavailable: bool) {
        self.lock().list_unavailable = unavailable;
    }

    pub fn all(&self) -> Vec<Override> {
        self.lock().records.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    pub fn find(&self, target: &OverrideTarget, resource_key: &str) -> Option<Override> {
        self.lock()
            .records
            .iter()
            .find(|r| r.resource_key == resource_key && r.target().ok().as_ref() == Some(target))
            .cloned()
    }

    /// Insert a raw record as-is, bypassing validation. Lets tests seed
    /// stale or odd data the way a long-lived backend would hold it.
    pub fn seed(&self, record: Override) {
        let mut state = self.lock();
        state.next_id = state.next_id.max(record.id.into_inner());
        state.records.push(record);
    }

    fn check_failure(state: &State, resource_key: &str) -> Result<(), ClientError> {
        if state.failing_keys.contains(resource_key) {
            return Err(ClientError::Server {
                status: 500,
                message: format!("Injected failure for {}", resource_key),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OverrideStore for InMemoryOverrideStore {
    async fn list(&self, target: &OverrideTarget) -> Result<Vec<Override>, ClientError> {
        let state = self.lock();
        if state.list_unavailable {
            return Err(ClientError::Unavailable("override listing is down".to_string()));
        }
        Ok(state
            .records
            .iter()
            .filter(|r| r.target().ok().as_ref() == Some(target))
            .cloned()
            .collect())
    }

    async fn create(&self, dto: &CreateOverrideDto) -> Result<Override, ClientError> {
        let target = OverrideTarget::from_parts(dto.target_type, &dto.target_id)?;
        let mut state = self.lock();
        Self::check_failure(&state, &dto.resource_key)?;

        let duplicate = state.records.iter().any(|r| {
            r.resource_key == dto.resource_key && r.target().ok().as_ref() == Some(&target)
        });
        if duplicate {
            return Err(ClientError::Conflict(format!(
                "Override for {} on {} already exists",
                target, dto.resource_key
            )));
        }

        state.next_id += 1;
        let record = Override {
            id: OverrideId::new(state.next_id),
            target_type: dto.target_type,
            target_id: target.target_id().to_string(),
            resource_key: dto.resource_key.clone(),
            view: dto.view,
            create: dto.create,
            edit: dto.edit,
            delete: dto.delete,
        };
        record.check()?;
        state.records.push(record.clone());

        debug!(override_id = %record.id, "Created override");
        Ok(record)
    }

    async fn update(
        &self,
        id: OverrideId,
        dto: &UpdateOverrideDto,
    ) -> Result<Override, ClientError> {
        let mut state = self.lock();
        let key = state
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.resource_key.clone())
            .ok_or_else(|| ClientError::NotFound(format!("Override {} not found", id)))?;
        Self::check_failure(&state, &key)?;

        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("Override {} not found", id)))?;
        record.view = dto.view;
        record.create = dto.create;
        record.edit = dto.edit;
        record.delete = dto.delete;

        Ok(record.clone())
    }

    async fn delete(&self, id: OverrideId) -> Result<(), ClientError> {
        let mut state = self.lock();
        let position = state
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("Override {} not found", id)))?;
        Self::check_failure(&state, &state.records[position].resource_key)?;
        state.records.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sekolah_core::{FULL_PERMISSIONS, READ_ONLY_PERMISSIONS, Role};

    fn guru() -> OverrideTarget {
        OverrideTarget::Role(Role::Guru)
    }

    #[tokio::test]
    async fn test_create_list_update_delete() {
        let store = InMemoryOverrideStore::new();
        let created = store
            .create(&CreateOverrideDto::new(&guru(), "nilai", FULL_PERMISSIONS))
            .await
            .unwrap();

        let listed = store.list(&guru()).await.unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert!(store.list(&OverrideTarget::Role(Role::Siswa)).await.unwrap().is_empty());

        let updated = store
            .update(created.id, &READ_ONLY_PERMISSIONS.into())
            .await
            .unwrap();
        assert_eq!(updated.permission(), READ_ONLY_PERMISSIONS);

        store.delete(created.id).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_one_override_per_target_and_resource() {
        let store = InMemoryOverrideStore::new();
        let dto = CreateOverrideDto::new(&guru(), "nilai", FULL_PERMISSIONS);
        store.create(&dto).await.unwrap();
        assert!(matches!(
            store.create(&dto).await,
            Err(ClientError::Conflict(_))
        ));

        let other_user = CreateOverrideDto::new(&OverrideTarget::user("42"), "nilai", FULL_PERMISSIONS);
        assert!(store.create(&other_user).await.is_ok());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_record() {
        let store = InMemoryOverrideStore::new();
        assert!(matches!(
            store.delete(OverrideId::new(99)).await,
            Err(ClientError::NotFound(_))
        ));
        assert!(matches!(
            store.update(OverrideId::new(99), &FULL_PERMISSIONS.into()).await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = InMemoryOverrideStore::new();
        store.fail_writes_for("tagihan");
        let err = store
            .create(&CreateOverrideDto::new(&guru(), "tagihan", FULL_PERMISSIONS))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 500);
        assert!(
            store
                .create(&CreateOverrideDto::new(&guru(), "nilai", FULL_PERMISSIONS))
                .await
                .is_ok()
        );

        store.set_list_unavailable(true);
        assert!(matches!(
            store.list(&guru()).await,
            Err(ClientError::Unavailable(_))
        ));
        store.clear_failures();
        assert_eq!(store.list(&guru()).await.unwrap().len(), 1);
    }
}
