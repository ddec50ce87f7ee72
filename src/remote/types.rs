//! DTOs and payload types for identity service requests/responses.

use serde::{Deserialize, Serialize};

use crate::model::{Capability, RoleRef};
use crate::session::profile::{deserialize_id, deserialize_roles};

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub(crate) access: String,
    #[serde(default)]
    pub(crate) refresh: String,
}

#[derive(Debug, Serialize)]
pub(super) struct RefreshRequest<'a> {
    pub(super) refresh: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct RefreshResponse {
    pub(super) access: String,
    #[serde(default)]
    pub(super) refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisteredUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub date_joined: Option<String>,
    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: Vec<RoleRef>,
}

/// Partial update for `PATCH /api/user/{id}/`; `None` fields are omitted.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Permission {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Permission {
    /// `name` carries the capability code on the wire.
    pub fn capability(&self) -> Capability {
        Capability::new(&self.name, self.description.clone().unwrap_or_default())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Role {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub model_display: Option<String>,
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub action_display: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub changes: serde_json::Value,
}

/// `{"detail": "..."}` acknowledgement returned by assignment endpoints.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Detail {
    #[serde(default)]
    pub detail: String,
}
