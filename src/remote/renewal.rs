//! Single-flight renewal of the access token.
//!
//! The first caller that needs a renewal spawns the request and parks a
//! shared handle to its outcome in `pending`; callers arriving while it is in
//! flight await the same handle instead of issuing their own request. The
//! spawned task clears the slot as soon as it has an outcome, so the next
//! expiry starts a fresh renewal.
//!
//! The coordinator never clears credentials on failure. Ending the session is
//! the gateway's decision.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

use super::http_client::network_error;
use super::types::{RefreshRequest, RefreshResponse};
use crate::error::RenewalError;
use crate::model::{CredentialPair, Token};
use crate::store::CredentialStore;

type PendingRenewal = Shared<BoxFuture<'static, Result<CredentialPair, RenewalError>>>;

#[derive(Clone)]
pub struct RenewalCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    client: reqwest::Client,
    refresh_url: String,
    store: Arc<dyn CredentialStore>,
    pending: Mutex<Option<PendingRenewal>>,
    started: AtomicU64,
}

impl RenewalCoordinator {
    pub fn new(client: reqwest::Client, refresh_url: String, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                refresh_url,
                store,
                pending: Mutex::new(None),
                started: AtomicU64::new(0),
            }),
        }
    }

    /// Renews the access token, joining an in-flight renewal when there is one.
    ///
    /// Fails with [`RenewalError::NoRefreshToken`] without touching the
    /// network when no refresh token is stored.
    pub async fn renew(&self) -> Result<CredentialPair, RenewalError> {
        let pending = {
            let mut slot = self
                .inner
                .pending
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match slot.as_ref() {
                Some(pending) => {
                    tracing::debug!("joining in-flight renewal");
                    pending.clone()
                }
                None => {
                    let Some(refresh) = self.inner.store.read().refresh else {
                        return Err(RenewalError::NoRefreshToken);
                    };
                    let pending = self.start(refresh);
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    /// Number of renewal requests issued so far.
    pub fn renewals_started(&self) -> u64 {
        self.inner.started.load(Ordering::SeqCst)
    }

    pub fn is_renewing(&self) -> bool {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    // Called with the `pending` lock held; the spawned task cannot clear the
    // slot before the caller has installed the handle.
    fn start(&self, refresh: Token) -> PendingRenewal {
        self.inner.started.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("starting token renewal");

        let inner = self.inner.clone();
        // Spawned so the request completes even if every waiter goes away.
        let task = tokio::spawn(async move {
            let outcome = inner.request(refresh).await;
            inner
                .pending
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            outcome
        });

        async move {
            task.await
                .unwrap_or_else(|e| Err(RenewalError::Failed(format!("renewal task: {}", e))))
        }
        .boxed()
        .shared()
    }
}

impl Inner {
    async fn request(&self, refresh: Token) -> Result<CredentialPair, RenewalError> {
        let resp = self
            .client
            .post(&self.refresh_url)
            .json(&RefreshRequest {
                refresh: refresh.as_str(),
            })
            .send()
            .await
            .map_err(|e| RenewalError::Failed(network_error(e).to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RenewalError::Failed(format!(
                "refresh endpoint returned {}",
                status.as_u16()
            )));
        }

        let body: RefreshResponse = resp
            .json()
            .await
            .map_err(|e| RenewalError::Failed(format!("parse refresh response: {}", e)))?;
        let access = Token::new(body.access)
            .ok_or_else(|| RenewalError::Failed("refresh response has empty access token".into()))?;
        // Rotation is optional; keep the old refresh token when none is returned.
        let refresh = body.refresh.and_then(Token::new).unwrap_or(refresh);

        let pair = CredentialPair::new(access, refresh);
        self.store
            .write(pair.clone())
            .map_err(|e| RenewalError::Failed(e.to_string()))?;
        tracing::debug!("token renewed");
        Ok(pair)
    }
}
