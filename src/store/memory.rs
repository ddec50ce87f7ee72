use std::sync::RwLock;

use crate::error::CredentialError;
use crate::model::CredentialPair;

use super::{CredentialStore, validate};

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    pair: RwLock<CredentialPair>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store; a half-set pair is rejected like any other write.
    pub fn with_pair(pair: CredentialPair) -> Result<Self, CredentialError> {
        let store = Self::new();
        store.write(pair)?;
        Ok(store)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self) -> CredentialPair {
        self.pair
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn write(&self, pair: CredentialPair) -> Result<(), CredentialError> {
        validate(&pair)?;
        *self
            .pair
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = pair;
        Ok(())
    }

    fn clear(&self) {
        *self
            .pair
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = CredentialPair::empty();
    }
}
