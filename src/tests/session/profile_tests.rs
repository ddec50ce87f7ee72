use super::*;

#[test]
fn object_shaped_profile_normalizes() {
    let session = session_from_profile(serde_json::json!({
        "id": "1",
        "email": "a@x.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "roles": [{"role__id": "r-1", "role__name": "admin"}],
        "is_superuser": false,
        "permissions": [{"name": "user.view", "description": "View users"}]
    }))
    .expect("normalize profile");

    assert_eq!(session.identity.id, "1");
    assert_eq!(session.identity.display_name(), "Ada Lovelace");
    assert_eq!(
        session.roles,
        vec![RoleRef {
            id: "r-1".into(),
            name: "admin".into()
        }]
    );
    let cap = session.capabilities.get("user.view").expect("capability");
    assert_eq!(cap.description, "View users");
    assert!(!session.superuser);
}

#[test]
fn string_shaped_profile_normalizes() {
    let session = session_from_profile(serde_json::json!({
        "id": 42,
        "email": "b@x.com",
        "roles": ["auditor", "auditor", "editor"],
        "is_superuser": true,
        "permissions": ["audit.view", "user.view", "audit.view"]
    }))
    .expect("normalize profile");

    assert_eq!(session.identity.id, "42");
    assert_eq!(session.identity.first_name, "");
    assert_eq!(session.identity.display_name(), "b@x.com");
    let names: Vec<_> = session.roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["auditor", "editor"]);
    assert_eq!(session.capabilities.len(), 2);
    assert_eq!(
        session.capabilities.get("audit.view").map(|c| c.description.as_str()),
        Some("")
    );
    assert!(session.superuser);
}

#[test]
fn mixed_and_missing_collections_are_tolerated() {
    let session = session_from_profile(serde_json::json!({
        "id": "7",
        "email": "c@x.com",
        "first_name": null,
        "roles": [{"id": 3, "name": "ops"}, "ops-lead"],
        "permissions": [{"name": "role.view"}, "role.delete", {"name": "", "description": "blank"}]
    }))
    .expect("normalize profile");

    assert_eq!(session.roles.len(), 2);
    assert_eq!(session.roles[0].id, "3");
    assert!(session.capabilities.contains("role.view"));
    assert!(session.capabilities.contains("role.delete"));
    assert!(!session.capabilities.contains(""));
    assert!(!session.superuser);

    let bare = session_from_profile(serde_json::json!({"id": "8", "email": "d@x.com"}))
        .expect("normalize bare profile");
    assert!(bare.roles.is_empty());
    assert!(bare.capabilities.is_empty());
}

#[test]
fn duplicate_capability_keeps_first_description() {
    let session = session_from_profile(serde_json::json!({
        "id": "1",
        "email": "a@x.com",
        "permissions": [
            {"name": "user.view", "description": "first"},
            {"name": "user.view", "description": "second"}
        ]
    }))
    .expect("normalize profile");
    assert_eq!(session.capabilities.len(), 1);
    assert_eq!(session.capabilities.get("user.view").map(|c| c.description.as_str()), Some("first"));
}

#[test]
fn profile_without_email_is_rejected() {
    assert!(session_from_profile(serde_json::json!({"id": "1"})).is_err());
}
