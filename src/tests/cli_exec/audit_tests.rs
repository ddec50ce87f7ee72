use super::*;

#[test]
fn timestamps_render_in_utc_minutes() {
    assert_eq!(fmt_ts_ui("2025-01-02T03:04:05Z"), "2025-01-02 03:04Z");
    assert_eq!(fmt_ts_ui("2025-01-02T01:30:00-02:00"), "2025-01-02 03:30Z");
}

#[test]
fn unparseable_timestamps_pass_through() {
    assert_eq!(fmt_ts_ui("yesterday"), "yesterday");
    assert_eq!(fmt_ts_ui(""), "");
}

#[test]
fn audit_line_summarizes_field_changes() {
    let log: AuditLog = serde_json::from_value(serde_json::json!({
        "id": 3,
        "user": "1",
        "user_email": "a@x.com",
        "model_name": "user",
        "model_display": "User",
        "object_id": "8c6f",
        "action": "update",
        "action_display": "Updated",
        "timestamp": "2025-01-02T03:04:05Z",
        "changes": {"first_name": {"from": "A", "to": "Ada"}}
    }))
    .expect("parse audit log");
    assert_eq!(
        audit_line(&log),
        "2025-01-02 03:04Z a@x.com Updated User 8c6f (first_name: \"A\" -> \"Ada\")"
    );
}
