mod config;
mod credentials;
mod identity;

pub use self::config::{
    CONFIG_VERSION, ClientSettings, ConsoleConfig, CredentialState, DEFAULT_TIMEOUT_MS,
};
pub use self::credentials::{CredentialPair, Token};
pub use self::identity::{Capability, CapabilitySet, Identity, RoleRef, Session};
