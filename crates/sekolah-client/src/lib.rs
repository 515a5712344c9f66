//! # Sekolah Client
//!
//! Access to persisted permission overrides.
//!
//! - [`store`]: the [`OverrideStore`] trait
//! - [`http`]: [`OverrideClient`], the REST implementation
//! - [`memory`]: [`InMemoryOverrideStore`], used by the mock backend and tests
//! - [`merge`]: [`fetch_merged_overrides`], overrides as a `resource_key -> Permission` map
//!
//! # Example
//!
//! ```ignore
//! use sekolah_client::{OverrideClient, fetch_merged_overrides};
//! use sekolah_config::BackendConfig;
//! use sekolah_core::Role;
//!
//! let client = OverrideClient::new(BackendConfig::from_env())?;
//! let overrides = fetch_merged_overrides(&client, Some(Role::Guru), None).await?;
//! ```

pub mod error;
pub mod http;
pub mod memory;
pub mod merge;
pub mod store;

pub use error::ClientError;
pub use http::OverrideClient;
pub use memory::InMemoryOverrideStore;
pub use merge::{fetch_merged_overrides, index_by_resource, permissions_by_resource};
pub use store::OverrideStore;
