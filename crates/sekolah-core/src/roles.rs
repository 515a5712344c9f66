//! The closed set of application roles.
//!
//! Roles carry no hierarchy. If a resource should grant an administrator
//! everything a teacher can do, its role-permission map has to say so
//! explicitly for both roles.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Admin,
    /// Principal
    KepalaSekolah,
    /// Teacher
    Guru,
    /// Student
    Siswa,
    /// Finance officer
    PetugasKeuangan,
    /// Parent
    OrangTua,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::KepalaSekolah,
        Role::Guru,
        Role::Siswa,
        Role::PetugasKeuangan,
        Role::OrangTua,
    ];

    /// Identifier used by the backend (`target_id` of role overrides).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::KepalaSekolah => "Kepala_Sekolah",
            Role::Guru => "Guru",
            Role::Siswa => "Siswa",
            Role::PetugasKeuangan => "Petugas_Keuangan",
            Role::OrangTua => "Orang_Tua",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::KepalaSekolah => "Kepala Sekolah",
            Role::Guru => "Guru",
            Role::Siswa => "Siswa",
            Role::PetugasKeuangan => "Petugas Keuangan",
            Role::OrangTua => "Orang Tua",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a role identifier. Accepts the backend spelling in any case,
/// with spaces or hyphens in place of underscores, and English aliases.
impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "admin" | "administrator" => Ok(Role::Admin),
            "kepala_sekolah" | "principal" => Ok(Role::KepalaSekolah),
            "guru" | "teacher" => Ok(Role::Guru),
            "siswa" | "student" => Ok(Role::Siswa),
            "petugas_keuangan" | "finance" | "finance_officer" => Ok(Role::PetugasKeuangan),
            "orang_tua" | "parent" => Ok(Role::OrangTua),
            _ => Err(AppError::bad_request(anyhow!("Unknown role: {}", s))),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
