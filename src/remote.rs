//! Request gateway: every call to the identity service goes through here.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::error::RequestError;
use crate::model::{ClientSettings, Token};
use crate::session::{EndReason, SessionSignal};
use crate::store::CredentialStore;

mod api;
mod http_client;
mod renewal;
pub(crate) mod types;

pub use self::api::AdminApi;
pub use self::renewal::RenewalCoordinator;
pub use self::types::*;

pub mod endpoints {
    pub const LOGIN: &str = "/api/login/";
    pub const REFRESH: &str = "/api/token/refresh/";
    pub const ME: &str = "/api/me";
    pub const REGISTER: &str = "/api/register/";
}

pub struct RequestGateway {
    settings: ClientSettings,
    client: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    renewal: RenewalCoordinator,
    signal: SessionSignal,
    // Serializes forced logouts so concurrent failures end the session once.
    expiry: Mutex<()>,
    expirations: AtomicU64,
}

impl RequestGateway {
    pub fn new(
        settings: ClientSettings,
        store: Arc<dyn CredentialStore>,
        signal: SessionSignal,
    ) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| RequestError::Network(format!("build http client: {}", e)))?;
        let renewal = RenewalCoordinator::new(
            client.clone(),
            http_client::join_url(&settings.base_url, endpoints::REFRESH),
            store.clone(),
        );
        Ok(Self {
            settings,
            client,
            store,
            renewal,
            signal,
            expiry: Mutex::new(()),
            expirations: AtomicU64::new(0),
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn renewal(&self) -> &RenewalCoordinator {
        &self.renewal
    }

    pub fn signal(&self) -> &SessionSignal {
        &self.signal
    }

    /// Number of forced logouts so far. Anything derived from the
    /// credentials before the count moved belongs to an ended session.
    pub fn expirations(&self) -> u64 {
        self.expirations.load(Ordering::SeqCst)
    }

    /// Sends one logical call.
    ///
    /// Public calls carry no credential and get no 401 handling. Protected
    /// calls attach the stored access token (if any) and, on a 401, renew and
    /// retry exactly once.
    pub async fn send(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&serde_json::Value>,
        public: bool,
    ) -> Result<serde_json::Value, RequestError> {
        if public {
            let resp = self.issue(&method, endpoint, body, None).await?;
            return http_client::decode(resp).await;
        }

        let used = self.store.read().access;
        let resp = self.issue(&method, endpoint, body, used.as_ref()).await?;
        if resp.status() != reqwest::StatusCode::UNAUTHORIZED {
            return http_client::decode(resp).await;
        }

        tracing::debug!(%method, endpoint, "authorization rejected; renewing");
        let retry_token = match self.store.read().access {
            // A concurrent renewal already replaced the token this call used.
            Some(current) if used.as_ref() != Some(&current) => current,
            _ => match self.renewal.renew().await {
                Ok(pair) => match pair.access {
                    Some(access) => access,
                    None => return Err(self.expire()),
                },
                Err(err) => {
                    tracing::warn!(error = %err, endpoint, "renewal failed");
                    return Err(self.expire());
                }
            },
        };

        let resp = self
            .issue(&method, endpoint, body, Some(&retry_token))
            .await?;
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(endpoint, "authorization rejected after renewal");
            return Err(self.expire());
        }
        http_client::decode(resp).await
    }

    pub async fn send_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&serde_json::Value>,
        public: bool,
    ) -> Result<T, RequestError> {
        let v = self.send(endpoint, method, body, public).await?;
        serde_json::from_value(v).map_err(|e| RequestError::Decode(format!("{}: {}", endpoint, e)))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, RequestError> {
        self.send_as(endpoint, Method::GET, None, false).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, RequestError> {
        self.send_as(endpoint, Method::POST, Some(body), false).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, RequestError> {
        self.send_as(endpoint, Method::PATCH, Some(body), false).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<(), RequestError> {
        self.send(endpoint, Method::DELETE, None, false).await?;
        Ok(())
    }

    /// Clears credentials and fires the session-ended signal, once per
    /// occurrence: callers that lose the race find the store already empty.
    fn expire(&self) -> RequestError {
        let _guard = self
            .expiry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.store.read().is_present() {
            self.store.clear();
            self.expirations.fetch_add(1, Ordering::SeqCst);
            tracing::warn!("session expired; credentials cleared");
            self.signal.emit(EndReason::Expired);
        }
        RequestError::SessionExpired
    }

    /// The bearer the next protected call will carry.
    pub fn current_access(&self) -> Option<Token> {
        self.store.read().access
    }
}
