use anyhow::{Context, Result};

use authcore::gate::codes;
use authcore::remote::{Role, User, UserPatch};

use crate::cli_runtime::Connected;
use crate::cli_subcommands::{RolesCommands, UsersCommands};

fn print_json<T: serde::Serialize>(v: &T, label: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(v).with_context(|| format!("serialize {} json", label))?
    );
    Ok(())
}

fn user_line(u: &User) -> String {
    let name = format!(
        "{} {}",
        u.first_name.as_deref().unwrap_or_default(),
        u.last_name.as_deref().unwrap_or_default()
    );
    let mut flags = Vec::new();
    if u.is_superuser {
        flags.push("superuser");
    }
    if !u.is_active {
        flags.push("inactive");
    }
    let roles = u.roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
    format!(
        "{} {} {} [{}]{}",
        u.id,
        u.email,
        name.trim(),
        roles.join(","),
        if flags.is_empty() {
            String::new()
        } else {
            format!(" ({})", flags.join(", "))
        }
    )
}

fn role_line(r: &Role) -> String {
    match r.description.as_deref() {
        Some(d) if !d.is_empty() => format!("{} {} - {}", r.id, r.name, d),
        _ => format!("{} {}", r.id, r.name),
    }
}

pub(super) async fn handle_users_command(conn: &Connected, command: UsersCommands) -> Result<()> {
    let api = conn.ctx.admin();
    match command {
        UsersCommands::List { json } => {
            conn.require(codes::USER_VIEW)?;
            let users = api.list_users().await.context("list users")?;
            if json {
                print_json(&users, "users")?;
            } else {
                for u in &users {
                    println!("{}", user_line(u));
                }
            }
        }
        UsersCommands::Show { id, json } => {
            conn.require(codes::USER_VIEW)?;
            let user = api.get_user(&id).await.context("get user")?;
            if json {
                print_json(&user, "user")?;
            } else {
                println!("{}", user_line(&user));
                if let Some(joined) = &user.date_joined {
                    println!("joined: {}", super::audit::fmt_ts_ui(joined));
                }
            }
        }
        UsersCommands::Update {
            id,
            email,
            first_name,
            last_name,
            active,
        } => {
            conn.require(codes::USER_CHANGE)?;
            let patch = UserPatch {
                email,
                first_name,
                last_name,
                is_active: active,
            };
            if patch.is_empty() {
                anyhow::bail!("nothing to update (pass --email, --first-name, --last-name or --active)");
            }
            let user = api.update_user(&id, &patch).await.context("update user")?;
            println!("Updated {}", user_line(&user));
        }
        UsersCommands::Delete { id } => {
            conn.require(codes::USER_DELETE)?;
            api.delete_user(&id).await.context("delete user")?;
            println!("Deleted user {}", id);
        }
        UsersCommands::Roles { id, json } => {
            conn.require(codes::USER_VIEW)?;
            let roles = api.user_roles(&id).await.context("list user roles")?;
            if json {
                print_json(&roles, "roles")?;
            } else {
                for r in &roles {
                    println!("{}", role_line(r));
                }
            }
        }
    }
    Ok(())
}

pub(super) async fn handle_roles_command(conn: &Connected, command: RolesCommands) -> Result<()> {
    let api = conn.ctx.admin();
    match command {
        RolesCommands::List { json } => {
            conn.require(codes::ROLE_VIEW)?;
            let roles = api.list_roles().await.context("list roles")?;
            if json {
                print_json(&roles, "roles")?;
            } else {
                for r in &roles {
                    println!("{}", role_line(r));
                }
            }
        }
        RolesCommands::Show { id, json } => {
            conn.require(codes::ROLE_VIEW)?;
            let role = api.get_role(&id).await.context("get role")?;
            if json {
                print_json(&role, "role")?;
            } else {
                println!("{}", role_line(&role));
                if role.permissions.is_empty() {
                    println!("(no permissions)");
                }
                for p in &role.permissions {
                    let cap = p.capability();
                    println!("  {} {}  {}", p.id, cap.code, cap.description);
                }
            }
        }
        RolesCommands::Create { name, description } => {
            conn.require(codes::ROLE_CHANGE)?;
            let role = api
                .create_role(&name, description.as_deref())
                .await
                .context("create role")?;
            println!("Created {}", role_line(&role));
        }
        RolesCommands::Delete { id } => {
            conn.require(codes::ROLE_DELETE)?;
            api.delete_role(&id).await.context("delete role")?;
            println!("Deleted role {}", id);
        }
        RolesCommands::Grant { id, permissions } => {
            conn.require(codes::ROLE_CHANGE)?;
            let out = api
                .grant_permissions(&id, &permissions)
                .await
                .context("grant permissions")?;
            println!("{}", super::detail_or(&out.detail, "Permissions granted"));
        }
        RolesCommands::Revoke { id, permissions } => {
            conn.require(codes::ROLE_CHANGE)?;
            let out = api
                .revoke_permissions(&id, &permissions)
                .await
                .context("revoke permissions")?;
            println!("{}", super::detail_or(&out.detail, "Permissions revoked"));
        }
    }
    Ok(())
}

pub(super) async fn handle_permissions_command(conn: &Connected, json: bool) -> Result<()> {
    let perms = conn
        .ctx
        .admin()
        .list_permissions()
        .await
        .context("list permissions")?;
    if json {
        return print_json(&perms, "permissions");
    }
    for p in &perms {
        let cap = p.capability();
        println!("{} {}  {}", p.id, cap.code, cap.description);
    }
    Ok(())
}
