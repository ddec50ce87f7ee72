//! Session context: login, logout, startup and the derived [`Session`].

use std::sync::{Arc, RwLock};

use reqwest::Method;
use tokio::sync::broadcast;

use crate::error::{LoginError, RequestError};
use crate::model::{ClientSettings, CredentialPair, Session, Token};
use crate::remote::types::{LoginRequest, LoginResponse};
use crate::remote::{AdminApi, RequestGateway, endpoints};
use crate::store::CredentialStore;

pub mod profile;
mod signal;

pub use self::signal::{EndReason, SessionEnded, SessionSignal};

/// A session together with the gateway's expiry count at the time its
/// profile fetch started.
struct HeldSession {
    epoch: u64,
    session: Arc<Session>,
}

pub struct SessionContext {
    gateway: Arc<RequestGateway>,
    signal: SessionSignal,
    session: RwLock<Option<HeldSession>>,
}

impl SessionContext {
    pub fn new(
        settings: ClientSettings,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, RequestError> {
        let signal = SessionSignal::new();
        let gateway = RequestGateway::new(settings, store, signal.clone())?;
        Ok(Self {
            gateway: Arc::new(gateway),
            signal,
            session: RwLock::new(None),
        })
    }

    pub fn gateway(&self) -> &Arc<RequestGateway> {
        &self.gateway
    }

    pub fn admin(&self) -> AdminApi {
        AdminApi::new(self.gateway.clone())
    }

    fn store(&self) -> &Arc<dyn CredentialStore> {
        self.gateway.store()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEnded> {
        self.signal.subscribe()
    }

    /// The current session, if credentials are held and the last profile
    /// fetch succeeded. A forced logout elsewhere makes this `None` at once,
    /// and it stays `None` even after new credentials are written.
    pub fn current_session(&self) -> Option<Arc<Session>> {
        if !self.store().read().is_present() {
            return None;
        }
        let epoch = self.gateway.expirations();
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .filter(|held| held.epoch == epoch)
            .map(|held| held.session.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    fn set_session(&self, held: Option<HeldSession>) {
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = held;
    }

    fn clear_local(&self) {
        self.store().clear();
        self.set_session(None);
    }

    /// Startup: validates stored credentials by fetching the profile.
    ///
    /// Failures are not reported; they leave the context unauthenticated.
    pub async fn initialize(&self) {
        if !self.store().read().is_present() {
            self.set_session(None);
            return;
        }
        match self.refresh_profile().await {
            Ok(session) => {
                tracing::info!(email = %session.identity.email, "restored session");
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored session could not be restored");
                self.clear_local();
            }
        }
    }

    /// Re-fetches `/api/me` and replaces the session wholesale.
    ///
    /// Any failure drops the current session.
    pub async fn refresh_profile(&self) -> Result<Arc<Session>, RequestError> {
        let epoch = self.gateway.expirations();
        let result = self
            .gateway
            .send(endpoints::ME, Method::GET, None, false)
            .await
            .and_then(|v| {
                profile::session_from_profile(v)
                    .map_err(|e| RequestError::Decode(format!("profile: {}", e)))
            });
        match result {
            Ok(session) => {
                let session = Arc::new(session);
                self.set_session(Some(HeldSession {
                    epoch,
                    session: session.clone(),
                }));
                Ok(session)
            }
            Err(err) => {
                self.set_session(None);
                Err(err)
            }
        }
    }

    /// Exchanges email/password for a credential pair and loads the profile.
    ///
    /// On any failure both the credentials and the session are cleared.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), LoginError> {
        match self.try_login(email, password).await {
            Ok(session) => {
                tracing::info!(email = %session.identity.email, "logged in");
                Ok(())
            }
            Err(err) => {
                tracing::info!(error = %err, "login failed");
                self.clear_local();
                Err(err)
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<Arc<Session>, LoginError> {
        // The previous identity must not be paired with the new credentials.
        self.set_session(None);
        let body = serde_json::to_value(LoginRequest { email, password })
            .map_err(|e| LoginError::Unexpected(e.to_string()))?;
        let v = self
            .gateway
            .send(endpoints::LOGIN, Method::POST, Some(&body), true)
            .await
            .map_err(login_error)?;
        let tokens: LoginResponse = serde_json::from_value(v)
            .map_err(|e| LoginError::Unexpected(format!("parse login response: {}", e)))?;

        let (Some(access), Some(refresh)) = (Token::new(tokens.access), Token::new(tokens.refresh))
        else {
            return Err(LoginError::Unexpected(
                "login response is missing tokens".to_string(),
            ));
        };
        self.store()
            .write(CredentialPair::new(access, refresh))
            .map_err(|e| LoginError::Unexpected(e.to_string()))?;

        self.refresh_profile().await.map_err(login_error)
    }

    /// Clears credentials and session. Calling it again is a no-op.
    pub fn logout(&self) {
        let was_active = self.store().read().is_present()
            || self
                .session
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .is_some();
        self.clear_local();
        if was_active {
            tracing::info!("logged out");
            self.signal.emit(EndReason::Logout);
        }
    }
}

fn login_error(err: RequestError) -> LoginError {
    match err {
        RequestError::Status {
            status: 400 | 401, ..
        }
        | RequestError::SessionExpired => LoginError::InvalidCredentials,
        RequestError::Network(msg) => LoginError::Network(msg),
        other => LoginError::Unexpected(other.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/session/session_tests.rs"]
mod tests;
