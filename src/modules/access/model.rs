use std::fmt;

use serde::Serialize;

/// Non-fatal problem encountered while loading permissions, shown to the
/// user as a banner. Resolution still works from static base permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessNotice {
    pub message: String,
}

impl AccessNotice {
    pub fn overrides_unavailable(reason: impl fmt::Display) -> Self {
        Self {
            message: format!(
                "Pengaturan hak akses khusus tidak dapat dimuat ({}). Menggunakan hak akses bawaan.",
                reason
            ),
        }
    }
}

impl fmt::Display for AccessNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
