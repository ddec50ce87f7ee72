use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;

use authcore::gate::CapabilityGate;
use authcore::model::{CONFIG_VERSION, ConsoleConfig};
use authcore::session::{EndReason, SessionContext, SessionEnded};
use authcore::store::{FileCredentialStore, write_atomic};

use crate::cli_subcommands::Commands;

#[derive(Parser)]
#[command(name = "authcore")]
#[command(about = "Identity service admin console", long_about = None)]
pub(crate) struct Cli {
    /// State directory (defaults to $AUTHCORE_HOME or ~/.authcore)
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

pub(crate) async fn run() -> Result<()> {
    let cli = Cli::parse();
    let console = Console::new(resolve_home(cli.home)?);
    crate::cli_exec::handle_command(&console, cli.command).await
}

fn resolve_home(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = flag {
        return Ok(home);
    }
    if let Some(home) = std::env::var_os("AUTHCORE_HOME") {
        return Ok(PathBuf::from(home));
    }
    let user_home = std::env::var_os("HOME")
        .context("cannot locate state directory (set --home or AUTHCORE_HOME)")?;
    Ok(PathBuf::from(user_home).join(".authcore"))
}

pub(crate) struct Console {
    home: PathBuf,
}

/// A connected session plus the receiver used to report forced logouts.
pub(crate) struct Connected {
    pub(crate) ctx: SessionContext,
    ended: broadcast::Receiver<SessionEnded>,
}

impl Console {
    fn new(home: PathBuf) -> Self {
        Self { home }
    }

    fn config_path(&self) -> PathBuf {
        self.home.join("config.json")
    }

    fn state_path(&self) -> PathBuf {
        self.home.join("state.json")
    }

    pub(crate) fn read_config(&self) -> Result<ConsoleConfig> {
        let path = self.config_path();
        let bytes = std::fs::read(&path).with_context(|| {
            format!(
                "no configuration at {} (run `authcore config set --url ...`)",
                path.display()
            )
        })?;
        let cfg: ConsoleConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != CONFIG_VERSION {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(cfg)
    }

    pub(crate) fn write_config(&self, cfg: &ConsoleConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.config_path(), &bytes).context("write config.json")?;
        Ok(())
    }

    /// Builds the session context from disk and restores any stored session.
    pub(crate) async fn connect(&self) -> Result<Connected> {
        let cfg = self.read_config()?;
        let store = Arc::new(FileCredentialStore::open(self.state_path()));
        let ctx = SessionContext::new(cfg.client_settings(), store)
            .context("build identity service client")?;
        let ended = ctx.subscribe();
        ctx.initialize().await;
        Ok(Connected { ctx, ended })
    }
}

impl Connected {
    /// Fails unless the session holds `code`.
    pub(crate) fn require(&self, code: &str) -> Result<()> {
        let session = self
            .ctx
            .current_session()
            .context("not logged in (run `authcore login --email ... --password ...`)")?;
        CapabilityGate::require(Some(session.as_ref()), code)?;
        Ok(())
    }

    /// Prints a notice for every forced logout observed during the command.
    pub(crate) fn report_session_end(&mut self) {
        while let Ok(ev) = self.ended.try_recv() {
            if ev.reason == EndReason::Expired {
                eprintln!("Session expired; log in again with `authcore login`.");
            }
        }
    }
}
