use anyhow::{Context, Result};

use authcore::error::{LoginError, RequestError};
use authcore::gate::CapabilityGate;
use authcore::remote::NewAccount;

use crate::cli_runtime::Connected;

pub(super) async fn handle_login_command(
    conn: &Connected,
    email: &str,
    password: &str,
) -> Result<()> {
    match conn.ctx.login(email, password).await {
        Ok(()) => {
            let name = conn
                .ctx
                .current_session()
                .map(|s| s.identity.display_name())
                .unwrap_or_else(|| email.to_string());
            println!("Logged in as {}", name);
            Ok(())
        }
        Err(LoginError::InvalidCredentials) => {
            anyhow::bail!("login rejected: check email and password")
        }
        Err(err) => Err(err).context("login"),
    }
}

pub(super) fn handle_logout_command(conn: &Connected) {
    conn.ctx.logout();
    println!("Logged out");
}

pub(super) async fn handle_register_command(
    conn: &Connected,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
) -> Result<()> {
    let account = NewAccount {
        email,
        password,
        first_name,
        last_name,
    };
    match conn.ctx.admin().register(&account).await {
        Ok(user) => {
            println!("Registered {} ({})", user.email, user.id);
            Ok(())
        }
        Err(err @ RequestError::Status { status: 400, .. }) => {
            let fields = err.field_errors();
            if fields.is_empty() {
                return Err(err).context("register");
            }
            let mut lines = vec!["registration rejected:".to_string()];
            for (field, msgs) in fields {
                lines.push(format!("- {}: {}", field, msgs.join("; ")));
            }
            anyhow::bail!(lines.join("\n"))
        }
        Err(err) => Err(err).context("register"),
    }
}

pub(super) fn handle_whoami_command(conn: &Connected, json: bool) -> Result<()> {
    let session = conn
        .ctx
        .current_session()
        .context("not logged in (run `authcore login --email ... --password ...`)")?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(session.as_ref()).context("serialize session json")?
        );
        return Ok(());
    }

    println!("id: {}", session.identity.id);
    println!("email: {}", session.identity.email);
    println!("name: {}", session.identity.display_name());
    println!("superuser: {}", session.superuser);
    let roles = session
        .roles
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>();
    println!(
        "roles: {}",
        if roles.is_empty() {
            "-".to_string()
        } else {
            roles.join(", ")
        }
    );
    println!("capabilities:");
    for cap in session.capabilities.iter() {
        if cap.description.is_empty() {
            println!("  {}", cap.code);
        } else {
            println!("  {}  {}", cap.code, cap.description);
        }
    }
    Ok(())
}

pub(super) fn handle_can_command(conn: &Connected, codes: &[String], all: bool) -> Result<()> {
    let session = conn.ctx.current_session();
    let allowed = if all {
        CapabilityGate::has_all(session.as_deref(), codes)
    } else {
        CapabilityGate::has_any(session.as_deref(), codes)
    };
    for code in codes {
        let ok = CapabilityGate::has(session.as_deref(), code);
        println!("{} {}", if ok { "allow" } else { "deny " }, code);
    }
    if !allowed {
        anyhow::bail!("denied");
    }
    Ok(())
}
