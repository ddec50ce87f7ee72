use anyhow::{Context, Result};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use authcore::remote::AuditLog;

use crate::cli_runtime::Connected;

fn fmt_ts_abs(ts: &str) -> Option<String> {
    let dt = OffsetDateTime::parse(ts, &Rfc3339).ok()?;
    dt.to_offset(time::UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month repr:numerical padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]Z"
        ))
        .ok()
}

pub(super) fn fmt_ts_ui(ts: &str) -> String {
    fmt_ts_abs(ts).unwrap_or_else(|| ts.to_string())
}

fn change_summary(changes: &serde_json::Value) -> String {
    let Some(obj) = changes.as_object() else {
        return String::new();
    };
    obj.iter()
        .map(|(field, change)| match (change.get("from"), change.get("to")) {
            (Some(from), Some(to)) => format!("{}: {} -> {}", field, from, to),
            _ => field.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn audit_line(log: &AuditLog) -> String {
    let who = log
        .user_email
        .as_deref()
        .or(log.user.as_deref())
        .unwrap_or("system");
    let action = log.action_display.as_deref().unwrap_or(&log.action);
    let model = log.model_display.as_deref().unwrap_or(&log.model_name);
    let mut line = format!(
        "{} {} {} {} {}",
        fmt_ts_ui(&log.timestamp),
        who,
        action,
        model,
        log.object_id
    );
    let changes = change_summary(&log.changes);
    if !changes.is_empty() {
        line.push_str(&format!(" ({})", changes));
    }
    line
}

pub(super) async fn handle_audit_command(
    conn: &Connected,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut logs = conn
        .ctx
        .admin()
        .list_audit_logs()
        .await
        .context("list audit logs")?;
    if let Some(n) = limit {
        logs.truncate(n);
    }
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&logs).context("serialize audit logs json")?
        );
        return Ok(());
    }
    for log in &logs {
        println!("{}", audit_line(log));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/cli_exec/audit_tests.rs"]
mod tests;
