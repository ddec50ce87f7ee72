use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Configure or show the identity service endpoint
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    #[command(flatten)]
    Session(SessionCommands),
}

/// Commands that need a connection to the identity service.
#[derive(Subcommand)]
pub(crate) enum SessionCommands {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget stored credentials
    Logout,

    /// Show the authenticated identity, roles and capabilities
    Whoami {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Check whether the current session holds capabilities
    Can {
        /// Capability codes, e.g. user.view
        #[arg(required = true)]
        codes: Vec<String>,
        /// Require every code instead of any
        #[arg(long)]
        all: bool,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },

    /// Manage roles and their permissions
    Roles {
        #[command(subcommand)]
        command: RolesCommands,
    },

    /// List permissions
    Permissions {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign a role to a user
    Assign {
        #[arg(long)]
        user: String,
        #[arg(long)]
        role: String,
    },

    /// Remove a role from a user
    Unassign {
        #[arg(long)]
        user: String,
        #[arg(long)]
        role: String,
    },

    /// Show the audit log
    Audit {
        /// Show at most N entries
        #[arg(long)]
        limit: Option<usize>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the configuration
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Set the identity service URL
    Set {
        #[arg(long)]
        url: String,
        /// Per-request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[derive(Subcommand)]
pub(crate) enum UsersCommands {
    /// List users
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show a user
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Update a user
    Update {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// true|false
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a user
    Delete { id: String },
    /// List roles assigned to a user
    Roles {
        id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum RolesCommands {
    /// List roles
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show a role with its permissions
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a role
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a role
    Delete { id: String },
    /// Grant permissions (by id) to a role
    Grant {
        id: String,
        #[arg(required = true)]
        permissions: Vec<String>,
    },
    /// Revoke permissions (by id) from a role
    Revoke {
        id: String,
        #[arg(required = true)]
        permissions: Vec<String>,
    },
}
