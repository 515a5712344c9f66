//! # Sekolah
//!
//! Role and permission resolution for the Sekolah school management application:
//! which menu entries a user sees and which actions (view, create, edit, delete)
//! they may take on each resource.
//!
//! ## Overview
//!
//! - **Static base permissions**: every gated menu resource carries a
//!   `RolePermissionMap` built from presets
//! - **Overrides**: admins persist per-role or per-user replacements on the backend
//! - **Resolution**: effective permission = user override, else role override,
//!   else static base, else an explicit fallback
//! - **Gating**: guards, buttons and conditional renders decide what a view shows
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli/              # CLI command handlers
//! ├── modules/          # Feature modules
//! │   ├── menu/        # Static menu tree and base permissions
//! │   ├── access/      # Effective-permission resolver
//! │   ├── overrides/   # Staged override editor and save
//! │   └── gating/      # Presentational permission gates
//! └── testing.rs        # Mock override backend (feature `test-utils`)
//! crates/
//! ├── sekolah-core/     # Permission, presets, maps, roles, access levels, AppError
//! ├── sekolah-models/   # Override records and request DTOs
//! ├── sekolah-config/   # Backend connection settings
//! ├── sekolah-client/   # Override store: HTTP and in-memory
//! └── sekolah-observability/ # Tracing setup
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `model.rs`: Data types
//! - `service.rs`: Logic
//!
//! ## Roles
//!
//! | Role | Backend id |
//! |------|------------|
//! | Admin | `Admin` |
//! | Kepala Sekolah | `Kepala_Sekolah` |
//! | Guru | `Guru` |
//! | Siswa | `Siswa` |
//! | Petugas Keuangan | `Petugas_Keuangan` |
//! | Orang Tua | `Orang_Tua` |
//!
//! ## Quick Start
//!
//! ### Environment Variables
//!
//! ```bash
//! SEKOLAH_API_URL=http://localhost:8000
//! SEKOLAH_API_TOKEN=secret
//! SEKOLAH_API_TIMEOUT_SECS=10
//! ```
//!
//! ### Resolving permissions
//!
//! ```ignore
//! use sekolah::modules::{PermissionResolver, school_menu};
//! use sekolah::sekolah_client::OverrideClient;
//! use sekolah::sekolah_config::BackendConfig;
//! use sekolah::sekolah_core::{Action, NONE, Role};
//!
//! let client = OverrideClient::new(BackendConfig::from_env())?;
//! let resolver = PermissionResolver::load(&client, school_menu(), Role::Guru, None, NONE).await;
//! if let Some(notice) = resolver.notice() {
//!     eprintln!("{notice}");
//! }
//! assert!(resolver.can("nilai", Action::Edit));
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line handlers
//! - [`modules`]: Feature modules (menu, access, overrides, gating)
//! - `testing`: Mock override backend for integration tests

pub mod cli;
pub mod modules;

#[cfg(feature = "test-utils")]
pub mod testing;

// Re-export workspace crates for convenience
pub use sekolah_client;
pub use sekolah_config;
pub use sekolah_core;
pub use sekolah_models;
pub use sekolah_observability;
