//! # Sekolah Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`backend`]: location and credentials of the REST backend
//!
//! # Example
//!
//! ```ignore
//! use sekolah_config::BackendConfig;
//!
//! let backend = BackendConfig::from_env();
//! ```

pub mod backend;

pub use backend::BackendConfig;
