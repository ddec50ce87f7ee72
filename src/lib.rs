//! Session and authorization core for the identity admin console.
//!
//! [`store`] holds the credential pair, [`remote`] sends every call with
//! renewal-on-401, [`session`] derives the authenticated [`model::Session`],
//! and [`gate`] decides what that session may do.

pub mod error;
pub mod gate;
pub mod model;
pub mod remote;
pub mod session;
pub mod store;

pub use crate::error::{CredentialError, Denied, LoginError, RenewalError, RequestError};
pub use crate::gate::CapabilityGate;
pub use crate::remote::{AdminApi, RenewalCoordinator, RequestGateway};
pub use crate::session::{EndReason, SessionContext, SessionEnded, SessionSignal};
pub use crate::store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
