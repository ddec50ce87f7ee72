use anyhow::{Context, Result};

use authcore::gate::codes;
use authcore::model::{ConsoleConfig, DEFAULT_TIMEOUT_MS};

use crate::cli_runtime::{Connected, Console};
use crate::cli_subcommands::{Commands, ConfigCommands, SessionCommands};

mod account;
mod admin;
mod audit;

pub(crate) async fn handle_command(console: &Console, command: Commands) -> Result<()> {
    match command {
        Commands::Config { command } => handle_config_command(console, command),
        Commands::Session(command) => {
            let mut conn = console.connect().await?;
            let out = handle_session_command(&conn, command).await;
            conn.report_session_end();
            out
        }
    }
}

async fn handle_session_command(conn: &Connected, command: SessionCommands) -> Result<()> {
    match command {
        SessionCommands::Login { email, password } => {
            account::handle_login_command(conn, &email, &password).await
        }
        SessionCommands::Logout => {
            account::handle_logout_command(conn);
            Ok(())
        }
        SessionCommands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            account::handle_register_command(conn, email, password, first_name, last_name).await
        }
        SessionCommands::Whoami { json } => account::handle_whoami_command(conn, json),
        SessionCommands::Can { codes, all } => account::handle_can_command(conn, &codes, all),
        SessionCommands::Users { command } => admin::handle_users_command(conn, command).await,
        SessionCommands::Roles { command } => admin::handle_roles_command(conn, command).await,
        SessionCommands::Permissions { json } => {
            conn.require(codes::PERMISSION_VIEW)?;
            admin::handle_permissions_command(conn, json).await
        }
        SessionCommands::Assign { user, role } => {
            conn.require(codes::USER_CHANGE)?;
            let out = conn
                .ctx
                .admin()
                .assign_role(&user, &role)
                .await
                .context("assign role")?;
            println!("{}", detail_or(&out.detail, "Role assigned"));
            Ok(())
        }
        SessionCommands::Unassign { user, role } => {
            conn.require(codes::USER_CHANGE)?;
            let out = conn
                .ctx
                .admin()
                .remove_role(&user, &role)
                .await
                .context("remove role")?;
            println!("{}", detail_or(&out.detail, "Role removed"));
            Ok(())
        }
        SessionCommands::Audit { limit, json } => {
            conn.require(codes::AUDIT_VIEW)?;
            audit::handle_audit_command(conn, limit, json).await
        }
    }
}

fn handle_config_command(console: &Console, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => {
            let cfg = console.read_config()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&cfg).context("serialize config json")?
                );
            } else {
                println!("url: {}", cfg.base_url);
                println!(
                    "timeout_ms: {}",
                    cfg.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
                );
            }
        }
        ConfigCommands::Set { url, timeout_ms } => {
            let mut cfg = ConsoleConfig::new(url);
            cfg.timeout_ms = timeout_ms;
            console.write_config(&cfg)?;
            println!("Configured {}", cfg.base_url);
        }
    }
    Ok(())
}

fn detail_or<'a>(detail: &'a str, fallback: &'a str) -> &'a str {
    if detail.is_empty() { fallback } else { detail }
}
