use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::CredentialError;
use crate::model::{CredentialPair, CredentialState};

use super::{CredentialStore, validate, write_atomic};

/// Credential pair persisted as `state.json` with `access_token` and
/// `refresh_token` entries.
///
/// The file is read once in [`FileCredentialStore::open`]; afterwards the
/// in-memory copy is authoritative and every mutation is written through.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    pair: RwLock<CredentialPair>,
}

impl FileCredentialStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let pair = load_pair(&path);
        Self {
            path,
            pair: RwLock::new(pair),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load_pair(path: &Path) -> CredentialPair {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return CredentialPair::empty(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "read credential state");
            return CredentialPair::empty();
        }
    };
    let st: CredentialState = match serde_json::from_slice(&bytes) {
        Ok(st) => st,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "parse credential state");
            return CredentialPair::empty();
        }
    };
    let pair = CredentialPair::from_entries(st.access_token.clone(), st.refresh_token.clone());
    if pair.is_empty() && (st.access_token.is_some() || st.refresh_token.is_some()) {
        tracing::warn!(path = %path.display(), "ignoring half-set credential state");
    }
    pair
}

impl CredentialStore for FileCredentialStore {
    fn read(&self) -> CredentialPair {
        self.pair
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn write(&self, pair: CredentialPair) -> Result<(), CredentialError> {
        validate(&pair)?;
        let st = CredentialState {
            access_token: pair.access.as_ref().map(|t| t.as_str().to_string()),
            refresh_token: pair.refresh.as_ref().map(|t| t.as_str().to_string()),
        };
        let persist_err = |message: String| CredentialError::Persist {
            path: self.path.display().to_string(),
            message,
        };
        let bytes = serde_json::to_vec_pretty(&st).map_err(|e| persist_err(e.to_string()))?;

        // Holding the write guard across the file write keeps disk and memory
        // in the same order for concurrent writers.
        let mut guard = self
            .pair
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        write_atomic(&self.path, &bytes).map_err(|e| persist_err(e.to_string()))?;
        *guard = pair;
        Ok(())
    }

    fn clear(&self) {
        let mut guard = self
            .pair
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "remove credential state");
            }
        }
        *guard = CredentialPair::empty();
    }
}
