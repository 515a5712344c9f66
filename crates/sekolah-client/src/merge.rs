//! Turning persisted overrides into a `resource_key -> Permission` lookup.

use std::collections::HashMap;

use sekolah_core::{Permission, Role};
use sekolah_models::{Override, OverrideTarget};
use tracing::instrument;

use crate::error::ClientError;
use crate::store::OverrideStore;

/// Index overrides by resource key. Later records win on duplicate keys.
pub fn index_by_resource(records: Vec<Override>) -> HashMap<String, Override> {
    records
        .into_iter()
        .map(|r| (r.resource_key.clone(), r))
        .collect()
}

pub fn permissions_by_resource(records: &[Override]) -> HashMap<String, Permission> {
    records
        .iter()
        .map(|r| (r.resource_key.clone(), r.permission()))
        .collect()
}

/// Fetch the overrides for a role and/or a user and merge them per resource key.
///
/// User overrides replace role overrides for the same resource. Keys with no
/// override at all are absent; callers fall back to the static base permission.
#[instrument(skip(store))]
pub async fn fetch_merged_overrides<S>(
    store: &S,
    role: Option<Role>,
    user_id: Option<&str>,
) -> Result<HashMap<String, Permission>, ClientError>
where
    S: OverrideStore + ?Sized,
{
    let mut merged = HashMap::new();

    if let Some(role) = role {
        let records = store.list(&OverrideTarget::Role(role)).await?;
        merged.extend(permissions_by_resource(&records));
    }

    if let Some(user_id) = user_id {
        let records = store.list(&OverrideTarget::user(user_id)).await?;
        merged.extend(permissions_by_resource(&records));
    }

    Ok(merged)
}
