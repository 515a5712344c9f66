//! Permission override records and the request bodies of the override endpoints.
//!
//! An override replaces the static base permission of one resource for one
//! role or one user. At most one override exists per
//! `(target_type, target_id, resource_key)`.

use std::fmt;

use anyhow::anyhow;
use sekolah_core::{AppError, Permission, Role};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::ids::OverrideId;
use crate::serde::deserialize_string_or_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Role,
    User,
}

impl TargetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetType::Role => "role",
            TargetType::User => "user",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who an override applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OverrideTarget {
    Role(Role),
    User(String),
}

impl OverrideTarget {
    pub fn user(id: impl Into<String>) -> Self {
        OverrideTarget::User(id.into())
    }

    pub const fn target_type(&self) -> TargetType {
        match self {
            OverrideTarget::Role(_) => TargetType::Role,
            OverrideTarget::User(_) => TargetType::User,
        }
    }

    pub fn target_id(&self) -> &str {
        match self {
            OverrideTarget::Role(role) => role.as_str(),
            OverrideTarget::User(id) => id,
        }
    }

    /// Rebuild a target from its wire representation. Role targets must name a known role.
    pub fn from_parts(target_type: TargetType, target_id: &str) -> Result<Self, AppError> {
        match target_type {
            TargetType::Role => target_id.parse().map(OverrideTarget::Role),
            TargetType::User if target_id.trim().is_empty() => {
                Err(AppError::bad_request(anyhow!("User target id must not be empty")))
            }
            TargetType::User => Ok(OverrideTarget::User(target_id.to_string())),
        }
    }

    pub fn filter(&self) -> OverrideFilterParams {
        OverrideFilterParams {
            target_type: self.target_type(),
            target_id: self.target_id().to_string(),
        }
    }
}

impl fmt::Display for OverrideTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.target_type(), self.target_id())
    }
}

/// Resource keys are lowercase identifiers such as `nilai` or `tagihan_spp`.
pub fn validate_resource_key(key: &str) -> Result<(), ValidationError> {
    let valid = key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' || c == '.');
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("resource_key");
        err.message = Some("Resource key may only contain a-z, 0-9, '_', '-' and '.'".into());
        Err(err)
    }
}

/// A persisted override as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Override {
    #[serde(alias = "id_override")]
    pub id: OverrideId,
    pub target_type: TargetType,
    #[serde(deserialize_with = "deserialize_string_or_number")]
    #[validate(length(min = 1, max = 100, message = "Target id must be 1-100 characters"))]
    pub target_id: String,
    #[validate(
        length(min = 1, max = 100, message = "Resource key must be 1-100 characters"),
        custom(function = "validate_resource_key")
    )]
    pub resource_key: String,
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Override {
    pub fn permission(&self) -> Permission {
        Permission::new(self.view, self.create, self.edit, self.delete)
    }

    pub fn target(&self) -> Result<OverrideTarget, AppError> {
        OverrideTarget::from_parts(self.target_type, &self.target_id)
    }

    /// Field validation plus the cross-field rule that a role target names a known role.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::unprocessable(anyhow!("Invalid override {}: {}", self.id, e)))?;
        self.target()?;
        Ok(())
    }

    /// Decode one raw record, rejecting anything that is not a well-formed override.
    pub fn from_value(value: serde_json::Value) -> Result<Self, AppError> {
        let record: Override = serde_json::from_value(value)
            .map_err(|e| AppError::unprocessable(anyhow!("Malformed override: {}", e)))?;
        record.check()?;
        Ok(record)
    }
}

/// Body of `POST /v1/permission-overrides`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateOverrideDto {
    pub target_type: TargetType,
    #[validate(length(min = 1, max = 100, message = "Target id must be 1-100 characters"))]
    pub target_id: String,
    #[validate(
        length(min = 1, max = 100, message = "Resource key must be 1-100 characters"),
        custom(function = "validate_resource_key")
    )]
    pub resource_key: String,
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl CreateOverrideDto {
    pub fn new(target: &OverrideTarget, resource_key: impl Into<String>, permission: Permission) -> Self {
        Self {
            target_type: target.target_type(),
            target_id: target.target_id().to_string(),
            resource_key: resource_key.into(),
            view: permission.view,
            create: permission.create,
            edit: permission.edit,
            delete: permission.delete,
        }
    }

    pub fn permission(&self) -> Permission {
        Permission::new(self.view, self.create, self.edit, self.delete)
    }
}

/// Body of `PUT /v1/permission-overrides/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOverrideDto {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl From<Permission> for UpdateOverrideDto {
    fn from(p: Permission) -> Self {
        Self {
            view: p.view,
            create: p.create,
            edit: p.edit,
            delete: p.delete,
        }
    }
}

impl UpdateOverrideDto {
    pub fn permission(&self) -> Permission {
        Permission::new(self.view, self.create, self.edit, self.delete)
    }
}

/// Query string of `GET /v1/permission-overrides`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideFilterParams {
    pub target_type: TargetType,
    pub target_id: String,
}

/// The list endpoint answers with a bare array or a `{ "data": [...] }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OverrideListResponse {
    Bare(Vec<serde_json::Value>),
    Envelope { data: Vec<serde_json::Value> },
}

impl OverrideListResponse {
    pub fn into_records(self) -> Vec<serde_json::Value> {
        match self {
            OverrideListResponse::Bare(records) => records,
            OverrideListResponse::Envelope { data } => data,
        }
    }
}

/// Body of `DELETE /v1/permission-overrides/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sekolah_core::{FULL_PERMISSIONS, VIEW_EDIT_PERMISSIONS};
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": 3,
            "target_type": "role",
            "target_id": "Petugas_Keuangan",
            "resource_key": "tagihan",
            "view": true,
            "create": true,
            "edit": true,
            "delete": true
        })
    }

    #[test]
    fn test_decode_valid_override() {
        let record = Override::from_value(sample()).unwrap();
        assert_eq!(record.id, OverrideId::new(3));
        assert_eq!(record.permission(), FULL_PERMISSIONS);
        assert_eq!(
            record.target().unwrap(),
            OverrideTarget::Role(Role::PetugasKeuangan)
        );
    }

    #[test]
    fn test_decode_accepts_id_override_and_numeric_target() {
        let value = json!({
            "id_override": "9",
            "target_type": "user",
            "target_id": 1204,
            "resource_key": "nilai",
            "view": true,
            "create": false,
            "edit": true,
            "delete": false
        });
        let record = Override::from_value(value).unwrap();
        assert_eq!(record.id, OverrideId::new(9));
        assert_eq!(record.target_id, "1204");
        assert_eq!(record.permission(), VIEW_EDIT_PERMISSIONS);
    }

    #[test]
    fn test_rejects_missing_capability() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("delete");
        assert!(Override::from_value(value).is_err());
    }

    #[test]
    fn test_rejects_non_boolean_capability() {
        let mut value = sample();
        value["view"] = json!(1);
        assert!(Override::from_value(value).is_err());
    }

    #[test]
    fn test_rejects_unknown_target_type_and_role() {
        let mut value = sample();
        value["target_type"] = json!("group");
        assert!(Override::from_value(value).is_err());

        let mut value = sample();
        value["target_id"] = json!("Satpam");
        assert!(Override::from_value(value).is_err());
    }

    #[test]
    fn test_rejects_bad_resource_key() {
        let mut value = sample();
        value["resource_key"] = json!("");
        assert!(Override::from_value(value).is_err());

        let mut value = sample();
        value["resource_key"] = json!("Tagihan SPP");
        assert!(Override::from_value(value).is_err());
    }

    #[test]
    fn test_create_dto_from_target() {
        let dto = CreateOverrideDto::new(
            &OverrideTarget::Role(Role::Guru),
            "nilai",
            VIEW_EDIT_PERMISSIONS,
        );
        assert!(dto.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({
                "target_type": "role",
                "target_id": "Guru",
                "resource_key": "nilai",
                "view": true,
                "create": false,
                "edit": true,
                "delete": false
            })
        );
    }

    #[test]
    fn test_user_target_must_not_be_empty() {
        assert!(OverrideTarget::from_parts(TargetType::User, "  ").is_err());
        assert_eq!(
            OverrideTarget::from_parts(TargetType::User, "u-1").unwrap(),
            OverrideTarget::user("u-1")
        );
    }

    #[test]
    fn test_list_response_shapes() {
        let bare: OverrideListResponse = serde_json::from_value(json!([sample()])).unwrap();
        assert_eq!(bare.into_records().len(), 1);

        let wrapped: OverrideListResponse =
            serde_json::from_value(json!({ "data": [sample(), sample()] })).unwrap();
        assert_eq!(wrapped.into_records().len(), 2);
    }
}
