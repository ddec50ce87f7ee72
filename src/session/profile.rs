//! Normalizes the `/api/me` profile into a [`Session`].
//!
//! The server has shipped two shapes for the same data:
//! roles as `[{"role__id", "role__name"}]` or `["name"]`, and permissions as
//! `[{"name", "description"}]` or `["code"]`. Both are accepted here so the
//! rest of the crate only ever sees [`RoleRef`] and [`Capability`].

use std::collections::HashSet;

use serde::{Deserialize, Deserializer};

use crate::model::{Capability, CapabilitySet, Identity, RoleRef, Session};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireRole {
    Ref {
        #[serde(rename = "role__id", alias = "id")]
        id: WireId,
        #[serde(rename = "role__name", alias = "name")]
        name: String,
    },
    Name(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WirePermission {
    Object {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
    Code(String),
}

#[derive(Debug, Deserialize)]
struct WireProfile {
    id: WireId,
    email: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    roles: Option<Vec<WireRole>>,
    #[serde(default)]
    is_superuser: bool,
    #[serde(default)]
    permissions: Option<Vec<WirePermission>>,
}

fn normalize_roles(roles: Vec<WireRole>) -> Vec<RoleRef> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for role in roles {
        let r = match role {
            WireRole::Ref { id, name } => RoleRef {
                id: id.into_string(),
                name,
            },
            // Name-only form: the name is the only stable key we have.
            WireRole::Name(name) => RoleRef {
                id: name.clone(),
                name,
            },
        };
        if !r.id.is_empty() && seen.insert(r.id.clone()) {
            out.push(r);
        }
    }
    out
}

fn normalize_permissions(perms: Vec<WirePermission>) -> CapabilitySet {
    perms
        .into_iter()
        .map(|p| match p {
            WirePermission::Object { name, description } => {
                Capability::new(name, description.unwrap_or_default())
            }
            WirePermission::Code(code) => Capability::new(code, ""),
        })
        .filter(|c| !c.code.is_empty())
        .collect()
}

/// Builds a session from a profile body.
pub fn session_from_profile(v: serde_json::Value) -> Result<Session, serde_json::Error> {
    let p: WireProfile = serde_json::from_value(v)?;
    let identity = Identity {
        id: p.id.into_string(),
        email: p.email,
        first_name: p.first_name.unwrap_or_default(),
        last_name: p.last_name.unwrap_or_default(),
        is_superuser: p.is_superuser,
    };
    Ok(Session::new(
        identity,
        normalize_roles(p.roles.unwrap_or_default()),
        normalize_permissions(p.permissions.unwrap_or_default()),
    ))
}

/// Accepts ids sent as JSON strings or numbers.
pub(crate) fn deserialize_id<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    WireId::deserialize(de).map(WireId::into_string)
}

pub(crate) fn deserialize_roles<'de, D>(de: D) -> Result<Vec<RoleRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let roles = Option::<Vec<WireRole>>::deserialize(de)?;
    Ok(normalize_roles(roles.unwrap_or_default()))
}

#[cfg(test)]
#[path = "../tests/session/profile_tests.rs"]
mod tests;
