//! Shared wire types used across the codebase

use serde::{Deserialize, Serialize};

/// Identifier of a permission (an "access" on the backend)
pub type PermissionId = i64;

/// Identifier of a role
pub type RoleId = i64;

/// Identifier of a user
pub type UserId = i64;

/// Flat permission record as served by `GET /role/access`.
///
/// The backend names the parent field `dad`; `null` marks a root permission.
/// Role listings embed permissions as bare `{ id, name }`, so `order` and the
/// parent default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub id: PermissionId,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(rename = "dad", default)]
    pub parent_id: Option<PermissionId>,
}

impl PermissionRecord {
    pub fn new(id: PermissionId, name: impl Into<String>, order: i64, parent_id: Option<PermissionId>) -> Self {
        Self {
            id,
            name: name.into(),
            order,
            parent_id,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Role with its granted permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub accesses: Vec<PermissionRecord>,
}

/// Role reference embedded in user payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub id: RoleId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<RoleRef>,
}

/// Singleton `{ "id": n }` object used in outbound role and user payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

/// Body sent when saving or updating a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePayload {
    pub name: String,
    pub accesses: Vec<IdRef>,
}

/// Body sent when creating a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<IdRef>,
}

/// Body sent when updating a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdatePayload {
    pub username: String,
    pub email: String,
}

/// `{ success, message }` reply used by the auth and role endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
