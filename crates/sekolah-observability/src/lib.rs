//! Sekolah Observability
//!
//! Logging initialisation for the Sekolah binaries.
//!
//! This module can be enabled or disabled at compile time via the `observability` feature flag.
//! At runtime, file logging can be further controlled via the `OBSERVABILITY_ENABLED` environment variable.
//!
//! # Features
//!
//! - `observability` (default): console plus rotating text and JSON log files
//!
//! # Examples
//!
//! ```no_run
//! use sekolah_observability::init_tracing;
//!
//! init_tracing();
//! tracing::info!("ready");
//! ```

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled};

// Console-only fallbacks when the feature is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    pub fn is_observability_enabled() -> bool {
        false
    }

    pub fn init_tracing() {
        crate::basic_logging::init_basic_console_logging();
    }
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
