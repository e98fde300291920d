//! Log-out route handler that invalidates authentication cookies and redirects users.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    AppState,
    auth::{Session, SessionEvent, SessionEvents, invalidate_auth_cookie},
    endpoints,
};

/// The state needed to log out.
#[derive(Debug, Clone)]
pub struct LogOutState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// Where to announce that the session ended.
    pub session_events: SessionEvents,
}

impl FromRef<AppState> for LogOutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_events: state.session_events.clone(),
        }
    }
}

impl FromRef<LogOutState> for Key {
    fn from_ref(state: &LogOutState) -> Self {
        state.cookie_key.clone()
    }
}

/// Invalidate the auth cookie and redirect the client to the log-in page.
pub async fn get_log_out(
    State(state): State<LogOutState>,
    session: Session,
    jar: PrivateCookieJar,
) -> Response {
    let jar = invalidate_auth_cookie(jar);

    if let Some(user_id) = session.current_user() {
        tracing::info!("User {user_id} logged out");
    }
    state
        .session_events
        .publish(SessionEvent::SignedOut(session.current_user()));

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{Router, http::header::SET_COOKIE, response::IntoResponse, routing::get};
    use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
    use axum_test::TestServer;
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        app_state::create_cookie_key,
        auth::{
            COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, SessionEvent, SessionEvents, UserID,
            set_auth_cookie,
        },
        endpoints,
    };

    use super::{LogOutState, get_log_out};

    fn get_test_state() -> LogOutState {
        LogOutState {
            cookie_key: create_cookie_key("42"),
            session_events: SessionEvents::new(),
        }
    }

    fn get_test_server(state: LogOutState) -> TestServer {
        let app = Router::new()
            .route(endpoints::LOG_OUT, get(get_log_out))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_out_invalidates_auth_cookie_and_redirects() {
        let state = get_test_state();
        let mut events = state.session_events.subscribe();
        let jar = set_auth_cookie(
            PrivateCookieJar::new(state.cookie_key.clone()),
            UserID::new(123),
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();
        let jar_response = jar.into_response();
        let set_cookie = jar_response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        let token_cookie = Cookie::parse(set_cookie.to_owned()).unwrap();
        let server = get_test_server(state);

        let response = server
            .get(endpoints::LOG_OUT)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::SignedOut(Some(UserID::new(123)))
        );
    }

    #[tokio::test]
    async fn guest_log_out_still_redirects() {
        let state = get_test_state();
        let mut events = state.session_events.subscribe();
        let server = get_test_server(state);

        let response = server.get(endpoints::LOG_OUT).await;

        response.assert_status_see_other();
        assert_eq!(events.try_recv().unwrap(), SessionEvent::SignedOut(None));
    }
}
