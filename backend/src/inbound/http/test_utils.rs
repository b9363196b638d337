//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};
use chrono::NaiveDate;

use crate::domain::{CheckInService, Error, HabitService, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryHabitStore;
use crate::test_support::MutableClock;

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per call and disables the `Secure` flag so cookies
/// survive plain-HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Stand-in for the external login flow: stores the path's user id.
pub async fn login_route(
    session: SessionContext,
    user_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(user_id.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Log `user_id` in through [`login_route`] mounted at `/login/{user_id}`
/// under `prefix` and return the session cookie.
pub async fn session_cookie_at<S, B>(app: &S, prefix: &str, user_id: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("{prefix}/login/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// [`session_cookie_at`] for apps mounting the login route at the root.
pub async fn session_cookie<S, B>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    session_cookie_at(app, "", user_id).await
}

/// HTTP state over a fresh in-memory store and a clock parked at noon on `today`.
pub fn memory_state(today: NaiveDate) -> (HttpState, Arc<MutableClock>) {
    let store = Arc::new(InMemoryHabitStore::new());
    let clock = Arc::new(MutableClock::at_noon(today));
    let state = HttpState::from_services(
        Arc::new(HabitService::new(store.clone(), store.clone(), clock.clone())),
        Arc::new(CheckInService::new(store.clone(), store, clock.clone())),
    );
    (state, clock)
}

/// All habit and check-in handlers under `/api/v1`, plus the test login route.
pub fn habit_api_app(
    state: HttpState,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    use crate::inbound::http::{check_ins, habits};

    actix_web::App::new()
        .app_data(web::Data::new(state))
        .wrap(crate::Trace)
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .route("/login/{user_id}", web::post().to(login_route))
                .service(habits::list_habits)
                .service(habits::create_habit)
                .service(habits::get_habit)
                .service(habits::update_habit)
                .service(habits::delete_habit)
                .service(check_ins::record_check_in)
                .service(check_ins::remove_check_in)
                .service(check_ins::list_check_ins),
        )
}
