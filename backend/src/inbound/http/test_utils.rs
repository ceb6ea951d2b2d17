//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::web;

use crate::domain::ports::{FIXTURE_PASSWORD, FIXTURE_USERNAME, FixtureLoginService};
use crate::domain::{DisposalService, ImpactService, ProgressService};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{json_error_handler, query_error_handler};
use crate::outbound::memory_store::InMemoryStore;
use crate::test_support::{MutableClock, RecordingNotificationEmitter};

/// Session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// JSON body for the fixture login.
pub fn fixture_login_body() -> serde_json::Value {
    serde_json::json!({ "username": FIXTURE_USERNAME, "password": FIXTURE_PASSWORD })
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

/// Handler state wired to a fresh in-memory store.
pub struct MemoryHarness {
    pub state: HttpState,
    pub emitter: Arc<RecordingNotificationEmitter>,
}

pub fn memory_state() -> MemoryHarness {
    let store = Arc::new(InMemoryStore::new());
    let clock: Arc<dyn mockable::Clock> = Arc::new(MutableClock::default());
    let emitter = Arc::new(RecordingNotificationEmitter::default());
    let impact = ImpactService::new(store.clone(), clock.clone());
    let state = HttpState {
        login: Arc::new(FixtureLoginService),
        disposals: Arc::new(DisposalService::new(
            store.clone(),
            impact.clone(),
            emitter.clone(),
            clock,
        )),
        progress: Arc::new(ProgressService::new(store)),
        impact: Arc::new(impact),
    };
    MemoryHarness { state, emitter }
}

/// Log in with the fixture account and return the session cookie.
///
/// The app must mount [`crate::inbound::http::users::login`] under
/// `/api/v1`.
pub async fn login_and_get_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    let request = actix_web::test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(fixture_login_body())
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    assert!(response.status().is_success(), "fixture login failed");
    session_cookie(&response)
}
