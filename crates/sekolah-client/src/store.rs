//! The seam between permission resolution and wherever overrides are persisted.

use async_trait::async_trait;
use sekolah_models::{CreateOverrideDto, Override, OverrideId, OverrideTarget, UpdateOverrideDto};

use crate::error::ClientError;

/// CRUD over persisted permission overrides.
///
/// Implementations must only hand out records that passed
/// [`Override::check`]; malformed records are dropped, not trusted.
#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// All overrides for one role or one user.
    async fn list(&self, target: &OverrideTarget) -> Result<Vec<Override>, ClientError>;

    async fn create(&self, dto: &CreateOverrideDto) -> Result<Override, ClientError>;

    async fn update(&self, id: OverrideId, dto: &UpdateOverrideDto)
    -> Result<Override, ClientError>;

    async fn delete(&self, id: OverrideId) -> Result<(), ClientError>;
}

#[async_trait]
impl<S> OverrideStore for std::sync::Arc<S>
where
    S: OverrideStore + ?Sized,
{
    async fn list(&self, target: &OverrideTarget) -> Result<Vec<Override>, ClientError> {
        (**self).list(target).await
    }

    async fn create(&self, dto: &CreateOverrideDto) -> Result<Override, ClientError> {
        (**self).create(dto).await
    }

    async fn update(
        &self,
        id: OverrideId,
        dto: &UpdateOverrideDto,
    ) -> Result<Override, ClientError> {
        (**self).update(id, dto).await
    }

    async fn delete(&self, id: OverrideId) -> Result<(), ClientError> {
        (**self).delete(id).await
    }
}
