use super::*;
use crate::store::MemoryCredentialStore;

fn seeded_context() -> (SessionContext, Arc<MemoryCredentialStore>) {
    let store = Arc::new(
        MemoryCredentialStore::with_pair(CredentialPair::new(
            Token::new("A1").expect("access"),
            Token::new("R1").expect("refresh"),
        ))
        .expect("seed store"),
    );
    // Nothing listens here; these tests never reach the network.
    let ctx = SessionContext::new(ClientSettings::new("http://127.0.0.1:9"), store.clone())
        .expect("build context");
    (ctx, store)
}

#[test]
fn logout_twice_matches_logout_once() {
    let (ctx, store) = seeded_context();
    let mut ended = ctx.subscribe();

    ctx.logout();
    assert!(store.read().is_empty());
    assert!(ctx.current_session().is_none());
    assert_eq!(
        ended.try_recv().expect("first logout signal"),
        SessionEnded {
            reason: EndReason::Logout
        }
    );

    ctx.logout();
    assert!(store.read().is_empty());
    assert!(ctx.current_session().is_none());
    assert!(ended.try_recv().is_err());
}

#[test]
fn session_is_hidden_once_credentials_are_gone() {
    let (ctx, store) = seeded_context();
    let session = profile::session_from_profile(serde_json::json!({
        "id": "1",
        "email": "a@x.com",
        "permissions": ["user.view"]
    }))
    .expect("profile");
    ctx.set_session(Some(HeldSession {
        epoch: ctx.gateway().expirations(),
        session: Arc::new(session),
    }));
    assert!(ctx.is_authenticated());

    store.clear();
    assert!(ctx.current_session().is_none());
}

#[test]
fn login_errors_map_to_login_taxonomy() {
    let rejected = RequestError::Status {
        status: 400,
        body: "{}".into(),
    };
    assert_eq!(login_error(rejected), LoginError::InvalidCredentials);
    assert_eq!(
        login_error(RequestError::Status {
            status: 401,
            body: String::new()
        }),
        LoginError::InvalidCredentials
    );
    assert_eq!(
        login_error(RequestError::SessionExpired),
        LoginError::InvalidCredentials
    );
    assert_eq!(
        login_error(RequestError::Network("refused".into())),
        LoginError::Network("refused".into())
    );
    assert!(matches!(
        login_error(RequestError::Status {
            status: 500,
            body: "boom".into()
        }),
        LoginError::Unexpected(_)
    ));
}
