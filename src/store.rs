//! Durable holder for the access/refresh credential pair.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::CredentialError;
use crate::model::CredentialPair;

mod file;
mod memory;

pub use self::file::FileCredentialStore;
pub use self::memory::MemoryCredentialStore;

/// Key-value contract for the credential pair.
///
/// Writes are whole-pair only, so readers observe either the previous pair or
/// the new one. Implementations must be safe to share across tasks.
pub trait CredentialStore: Send + Sync {
    fn read(&self) -> CredentialPair;

    /// Rejects half-set pairs with [`CredentialError::InvalidCredentialPair`].
    fn write(&self, pair: CredentialPair) -> Result<(), CredentialError>;

    /// Idempotent; never fails.
    fn clear(&self);
}

fn validate(pair: &CredentialPair) -> Result<(), CredentialError> {
    if pair.is_present() {
        Ok(())
    } else {
        Err(CredentialError::InvalidCredentialPair)
    }
}

/// Writes through a temp file and rename so readers never see a partial file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
    }
    fs::rename(&tmp, path)
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
