use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use authcore::model::ClientSettings;
use authcore::session::SessionContext;
use authcore::store::CredentialStore;

pub const EMAIL: &str = "a@x.com";
pub const PASSWORD: &str = "secret";

/// In-process identity service double bound to an ephemeral port.
pub struct IdentityDouble {
    pub base_url: String,
    pub state: Arc<DoubleState>,
    server: tokio::task::JoinHandle<()>,
}

impl Drop for IdentityDouble {
    fn drop(&mut self) {
        self.server.abort();
    }
}

struct Account {
    password: String,
    profile: serde_json::Value,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    access: HashMap<String, String>,
    refresh: HashMap<String, String>,
    next_access: u32,
    next_refresh: u32,
    rotate_refresh: bool,
    refresh_delay: Duration,
    refresh_status: Option<u16>,
    me_status: Option<u16>,
    me_delay: Duration,
    reject_all: bool,
    probe_bearers: Vec<Option<String>>,
}

#[derive(Default)]
pub struct DoubleState {
    inner: Mutex<Inner>,
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
}

impl DoubleState {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("double state lock")
    }

    pub fn add_account(&self, email: &str, password: &str, profile: serde_json::Value) {
        self.lock().accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                profile,
            },
        );
    }

    /// Invalidates every access token issued so far.
    pub fn expire_access(&self) {
        self.lock().access.clear();
    }

    pub fn set_rotate_refresh(&self, rotate: bool) {
        self.lock().rotate_refresh = rotate;
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        self.lock().refresh_delay = delay;
    }

    pub fn fail_refresh_with(&self, status: u16) {
        self.lock().refresh_status = Some(status);
    }

    pub fn fail_me_with(&self, status: Option<u16>) {
        self.lock().me_status = status;
    }

    /// Every protected endpoint answers 401 regardless of the token.
    pub fn reject_all(&self) {
        self.lock().reject_all = true;
    }

    pub fn accept_valid_tokens(&self) {
        self.lock().reject_all = false;
    }

    pub fn set_me_delay(&self, delay: Duration) {
        self.lock().me_delay = delay;
    }

    pub fn probe_bearers(&self) -> Vec<Option<String>> {
        self.lock().probe_bearers.clone()
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    fn mint_access(inner: &mut Inner, email: &str) -> String {
        inner.next_access += 1;
        let token = format!("A{}", inner.next_access);
        inner.access.insert(token.clone(), email.to_string());
        token
    }

    fn mint_refresh(inner: &mut Inner, email: &str) -> String {
        inner.next_refresh += 1;
        let token = format!("R{}", inner.next_refresh);
        inner.refresh.insert(token.clone(), email.to_string());
        token
    }

    fn authorize(&self, headers: &HeaderMap) -> Option<String> {
        let inner = self.lock();
        if inner.reject_all {
            return None;
        }
        let token = bearer(headers)?;
        inner.access.get(&token).cloned()
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"detail": "Given token not valid for any token type"})),
    )
        .into_response()
}

fn status_only(code: u16) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(serde_json::json!({"detail": "forced failure"}))).into_response()
}

async fn login(State(st): State<Arc<DoubleState>>, Json(body): Json<serde_json::Value>) -> Response {
    st.login_calls.fetch_add(1, Ordering::SeqCst);
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();
    let mut inner = st.lock();
    let ok = inner
        .accounts
        .get(&email)
        .is_some_and(|a| a.password == password);
    if !ok {
        return unauthorized();
    }
    let access = DoubleState::mint_access(&mut inner, &email);
    let refresh = DoubleState::mint_refresh(&mut inner, &email);
    Json(serde_json::json!({"access": access, "refresh": refresh})).into_response()
}

async fn refresh(
    State(st): State<Arc<DoubleState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    st.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let delay = st.lock().refresh_delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mut inner = st.lock();
    if let Some(code) = inner.refresh_status {
        return status_only(code);
    }
    let presented = body["refresh"].as_str().unwrap_or_default().to_string();
    let Some(email) = inner.refresh.get(&presented).cloned() else {
        return unauthorized();
    };
    let access = DoubleState::mint_access(&mut inner, &email);
    if inner.rotate_refresh {
        inner.refresh.remove(&presented);
        let rotated = DoubleState::mint_refresh(&mut inner, &email);
        return Json(serde_json::json!({"access": access, "refresh": rotated})).into_response();
    }
    Json(serde_json::json!({"access": access})).into_response()
}

async fn me(State(st): State<Arc<DoubleState>>, headers: HeaderMap) -> Response {
    let delay = st.lock().me_delay;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let Some(email) = st.authorize(&headers) else {
        return unauthorized();
    };
    let inner = st.lock();
    if let Some(code) = inner.me_status {
        return status_only(code);
    }
    match inner.accounts.get(&email) {
        Some(a) => Json(a.profile.clone()).into_response(),
        None => unauthorized(),
    }
}

async fn probe(State(st): State<Arc<DoubleState>>, headers: HeaderMap) -> Response {
    st.probe_calls.fetch_add(1, Ordering::SeqCst);
    st.lock().probe_bearers.push(bearer(&headers));
    if st.authorize(&headers).is_none() {
        return unauthorized();
    }
    Json(serde_json::json!({"ok": true, "token": bearer(&headers)})).into_response()
}

async fn register(
    State(st): State<Arc<DoubleState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let mut inner = st.lock();
    if inner.accounts.contains_key(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"errors": {"email": ["user with this email already exists."]}})),
        )
            .into_response();
    }
    let id = (inner.accounts.len() + 1).to_string();
    let first_name = body["first_name"].clone();
    let last_name = body["last_name"].clone();
    inner.accounts.insert(
        email.clone(),
        Account {
            password,
            profile: serde_json::json!({
                "id": id, "email": email, "roles": [], "is_superuser": false, "permissions": []
            }),
        },
    );
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": id, "email": email, "first_name": first_name, "last_name": last_name
        })),
    )
        .into_response()
}

async fn list_users(State(st): State<Arc<DoubleState>>, headers: HeaderMap) -> Response {
    if st.authorize(&headers).is_none() {
        return unauthorized();
    }
    let inner = st.lock();
    let mut users: Vec<serde_json::Value> = inner
        .accounts
        .iter()
        .map(|(email, a)| {
            serde_json::json!({
                "id": a.profile["id"],
                "email": email,
                "first_name": a.profile.get("first_name").cloned().unwrap_or_default(),
                "last_name": a.profile.get("last_name").cloned().unwrap_or_default(),
                "is_active": true,
                "is_superuser": a.profile["is_superuser"],
                "roles": [{"role__id": "r1", "role__name": "admin"}]
            })
        })
        .collect();
    users.sort_by(|a, b| a["email"].as_str().cmp(&b["email"].as_str()));
    Json(serde_json::Value::Array(users)).into_response()
}

async fn delete_user(
    State(st): State<Arc<DoubleState>>,
    Path(_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if st.authorize(&headers).is_none() {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn remove_role(
    State(st): State<Arc<DoubleState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if st.authorize(&headers).is_none() {
        return unauthorized();
    }
    if body.get("user").is_none() || body.get("role").is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"detail": "user and role are required"})),
        )
            .into_response();
    }
    Json(serde_json::json!({"detail": "Role removed"})).into_response()
}

async fn role_permissions(
    State(st): State<Arc<DoubleState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if st.authorize(&headers).is_none() {
        return unauthorized();
    }
    if id != "r1" {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "Not found."})),
        )
            .into_response();
    }
    Json(serde_json::json!([
        {"id": 1, "name": "user.view", "description": "View users"},
        {"id": "2", "name": "user.change"}
    ]))
    .into_response()
}

async fn audit_logs(State(st): State<Arc<DoubleState>>, headers: HeaderMap) -> Response {
    if st.authorize(&headers).is_none() {
        return unauthorized();
    }
    Json(serde_json::json!([{
        "id": 1,
        "user": "1",
        "user_email": EMAIL,
        "model_name": "user",
        "model_display": "User",
        "object_id": "2",
        "action": "delete",
        "action_display": "Deleted",
        "timestamp": "2025-01-02T03:04:05Z",
        "changes": {"id": "2"}
    }]))
    .into_response()
}

pub fn default_profile() -> serde_json::Value {
    serde_json::json!({
        "id": "1",
        "email": EMAIL,
        "roles": [],
        "is_superuser": false,
        "permissions": [{"name": "user.view", "description": "View users"}]
    })
}

/// Starts the double with one account (`a@x.com` / `secret`).
pub async fn spawn_double() -> IdentityDouble {
    let state = Arc::new(DoubleState::default());
    state.add_account(EMAIL, PASSWORD, default_profile());

    let app = Router::new()
        .route("/api/login/", post(login))
        .route("/api/token/refresh/", post(refresh))
        .route("/api/me", get(me))
        .route("/api/probe", get(probe))
        .route("/api/register/", post(register))
        .route("/api/user/", get(list_users))
        .route("/api/user/:id/", delete(delete_user))
        .route("/api/user_role/remove_role/", post(remove_role))
        .route("/api/roles/:id/permissions/", get(role_permissions))
        .route("/api/audit-logs/", get(audit_logs))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind identity double");
    let addr = listener.local_addr().expect("identity double addr");
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    IdentityDouble {
        base_url: format!("http://{}", addr),
        state,
        server,
    }
}

#[allow(dead_code)]
pub fn context(double: &IdentityDouble, store: Arc<dyn CredentialStore>) -> SessionContext {
    context_with_timeout(double, store, Duration::from_secs(5))
}

#[allow(dead_code)]
pub fn context_with_timeout(
    double: &IdentityDouble,
    store: Arc<dyn CredentialStore>,
    timeout: Duration,
) -> SessionContext {
    SessionContext::new(
        ClientSettings::new(&double.base_url).with_timeout(timeout),
        store,
    )
    .expect("build session context")
}
