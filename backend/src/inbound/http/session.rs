//! Signed-cookie session helpers.
//!
//! Handlers use [`SessionContext`] instead of the raw Actix session. The
//! cookie carries the user id and the time the session was issued; sessions
//! older than [`SESSION_TTL_DAYS`] are discarded even when the browser still
//! presents the cookie.

use actix_session::{Session, SessionGetError};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{Duration, Utc};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use super::session_config::SESSION_TTL_DAYS;
use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ISSUED_AT_KEY: &str = "issued_at";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for `user_id`.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .and_then(|()| self.0.insert(ISSUED_AT_KEY, Utc::now().timestamp()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop all session state.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Current user id, if the session is present and still fresh.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let read_error =
            |error: SessionGetError| Error::internal(format!("failed to read session: {error}"));
        let Some(raw) = self.0.get::<String>(USER_ID_KEY).map_err(read_error)? else {
            return Ok(None);
        };
        let issued_at = self.0.get::<i64>(ISSUED_AT_KEY).map_err(read_error)?;
        let fresh = issued_at.is_some_and(|issued| {
            Utc::now().timestamp() - issued < Duration::days(SESSION_TTL_DAYS).num_seconds()
        });
        if !fresh {
            warn!("discarding expired session");
            self.0.purge();
            return Ok(None);
        }
        match raw.parse::<UserId>() {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use actix_session::Session;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
    use crate::inbound::http::test_utils::test_session_middleware;

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = session.require_user_id()?;
        Ok(HttpResponse::Ok().body(id.to_string()))
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .expect("session cookie set")
            .into_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/login",
                    web::get().to(|session: SessionContext| async move {
                        let id: UserId = FIXTURE_ID.parse().expect("fixture id");
                        session.persist_user(&id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request())
            .await;
        assert_eq!(login.status(), StatusCode::OK);
        let cookie = session_cookie(&login);

        let me = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(test::read_body(me).await, FIXTURE_ID);
    }

    #[rstest]
    #[case::missing_session(None)]
    #[case::expired_session(Some(Utc::now().timestamp() - Duration::days(SESSION_TTL_DAYS + 1).num_seconds()))]
    #[actix_web::test]
    async fn stale_or_missing_sessions_are_unauthorised(#[case] issued_at: Option<i64>) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/forge",
                    web::get().to(move |session: Session| async move {
                        session
                            .insert(USER_ID_KEY, FIXTURE_ID)
                            .expect("insert user id");
                        if let Some(issued_at) = issued_at {
                            session
                                .insert(ISSUED_AT_KEY, issued_at)
                                .expect("insert issued at");
                        }
                        HttpResponse::Ok()
                    }),
                )
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let forged =
            test::call_service(&app, test::TestRequest::get().uri("/forge").to_request()).await;
        let me = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/me")
                .cookie(session_cookie(&forged))
                .to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn tampered_cookies_are_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/me", web::get().to(whoami)),
        )
        .await;
        let forged = Cookie::new(
            SESSION_COOKIE_NAME,
            format!(r#"{{"{USER_ID_KEY}":"\"{FIXTURE_ID}\""}}"#),
        );
        let me = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(forged).to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    }
}
