//! Discrete access levels offered by the override editor.
//!
//! A level is derived by comparing a permission against the five presets.
//! Anything that matches none of them is `Custom`.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::permissions::{
    FULL_PERMISSIONS, NONE, Permission, READ_ONLY_PERMISSIONS, VIEW_CREATE_PERMISSIONS,
    VIEW_EDIT_PERMISSIONS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    None,
    View,
    ViewCreate,
    ViewEdit,
    Full,
    Custom,
}

/// Named levels and the preset each one stands for, in menu order.
const PRESET_LEVELS: [(AccessLevel, Permission); 5] = [
    (AccessLevel::None, NONE),
    (AccessLevel::View, READ_ONLY_PERMISSIONS),
    (AccessLevel::ViewCreate, VIEW_CREATE_PERMISSIONS),
    (AccessLevel::ViewEdit, VIEW_EDIT_PERMISSIONS),
    (AccessLevel::Full, FULL_PERMISSIONS),
];

impl AccessLevel {
    /// Levels an admin can pick. `Custom` is only ever derived.
    pub const SELECTABLE: [AccessLevel; 5] = [
        AccessLevel::None,
        AccessLevel::View,
        AccessLevel::ViewCreate,
        AccessLevel::ViewEdit,
        AccessLevel::Full,
    ];

    pub fn from_permission(permission: &Permission) -> Self {
        PRESET_LEVELS
            .iter()
            .find(|(_, preset)| preset == permission)
            .map(|(level, _)| *level)
            .unwrap_or(AccessLevel::Custom)
    }

    /// The preset behind a named level; `None` for `Custom`.
    pub fn permission(&self) -> Option<Permission> {
        PRESET_LEVELS
            .iter()
            .find(|(level, _)| level == self)
            .map(|(_, preset)| *preset)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            AccessLevel::None => "Tidak Ada Akses",
            AccessLevel::View => "Lihat",
            AccessLevel::ViewCreate => "Lihat + Tambah",
            AccessLevel::ViewEdit => "Lihat + Ubah",
            AccessLevel::Full => "Akses Penuh",
            AccessLevel::Custom => "Kustom",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::View => "view",
            AccessLevel::ViewCreate => "view_create",
            AccessLevel::ViewEdit => "view_edit",
            AccessLevel::Full => "full",
            AccessLevel::Custom => "custom",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '+', ' '], "_");
        match normalized.as_str() {
            "none" | "no_access" => Ok(AccessLevel::None),
            "view" | "read" | "read_only" => Ok(AccessLevel::View),
            "view_create" => Ok(AccessLevel::ViewCreate),
            "view_edit" => Ok(AccessLevel::ViewEdit),
            "full" => Ok(AccessLevel::Full),
            "custom" => Ok(AccessLevel::Custom),
            _ => Err(AppError::bad_request(anyhow!("Unknown access level: {}", s))),
        }
    }
}

impl From<Permission> for AccessLevel {
    fn from(permission: Permission) -> Self {
        AccessLevel::from_permission(&permission)
    }
}
