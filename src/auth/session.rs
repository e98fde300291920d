//! The signed in user for a request, and notifications for when that changes.
//!
//! Pages are shown to guests and signed in users alike, so a missing or
//! expired cookie is not an error here. It just means the request comes from
//! a guest.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::Duration;
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};

use crate::{
    AppState,
    auth::{
        UserID,
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
    },
    timezone::get_local_offset,
};

/// Who made the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: Option<UserID>,
}

impl Session {
    /// A session for a visitor that has not signed in.
    pub fn guest() -> Self {
        Self { user_id: None }
    }

    /// A session for the user `user_id`.
    pub fn signed_in(user_id: UserID) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// The signed in user, or `None` for guests.
    pub fn current_user(&self) -> Option<UserID> {
        self.user_id
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        match get_token_from_cookies(&jar) {
            Ok(token) => Ok(Session::signed_in(token.user_id)),
            Err(_) => Ok(Session::guest()),
        }
    }
}

/// A change to who is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// An existing user signed in.
    SignedIn(UserID),
    /// A new account was created and signed in.
    SignedUp(UserID),
    /// The session was ended. Holds the user that was signed in, if any.
    SignedOut(Option<UserID>),
}

const SESSION_EVENT_CAPACITY: usize = 64;

/// Broadcasts [SessionEvent]s to any number of subscribers.
///
/// Cloning gives another handle to the same channel.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Create a channel with no subscribers.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SESSION_EVENT_CAPACITY);

        Self { sender }
    }

    /// Send `event` to every current subscriber.
    pub fn publish(&self, event: SessionEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!("No subscribers for session event {event:?}");
        }
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Call `callback` for each event published after this call.
    ///
    /// The returned task stops once every [SessionEvents] handle is dropped,
    /// or when it is aborted.
    pub fn subscribe_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: Fn(SessionEvent) + Send + 'static,
    {
        let mut receiver = self.subscribe();

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => callback(event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Session event subscriber skipped {skipped} events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// The state needed to refresh the session cookie.
#[derive(Clone)]
pub struct SessionState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts after the most recent request.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for SessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<SessionState> for Key {
    fn from_ref(state: &SessionState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware that pushes back the expiry of a valid session cookie.
///
/// Requests without a valid session are passed through untouched. Responses
/// that already set a cookie, e.g. from logging in or out, are left alone so
/// the handler's cookie wins.
pub async fn refresh_session(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = PrivateCookieJar::<Key>::from_request_parts(&mut parts, &state)
        .await
        .unwrap_or_else(|never| match never {});
    let has_session = get_token_from_cookies(&jar).is_ok();

    let response = next.run(Request::from_parts(parts, body)).await;

    if !has_session || response.headers().contains_key(SET_COOKIE) {
        return response;
    }

    let local_offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => {
            tracing::error!(
                "Could not get local timezone \"{}\", session was not extended.",
                state.local_timezone
            );
            return response;
        }
    };

    let jar = match extend_auth_cookie_duration_if_needed(jar, state.cookie_duration, local_offset)
    {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error extending cookie duration: {error}");
            return response;
        }
    };

    let (mut parts, body) = response.into_parts();
    for (key, value) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, value.to_owned());
    }

    Response::from_parts(parts, body)
}

#[cfg(test)]
mod session_tests {
    use axum::{
        Router, middleware,
        extract::State,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::TestServer;
    use sha2::Digest;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        auth::{COOKIE_TOKEN, UserID, invalidate_auth_cookie, set_auth_cookie},
        timezone::get_local_offset,
    };

    use super::{Session, SessionState, refresh_session};

    async fn whoami(session: Session) -> String {
        match session.current_user() {
            Some(user_id) => user_id.to_string(),
            None => "guest".to_owned(),
        }
    }

    async fn stub_log_in(
        State(state): State<SessionState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        let local_offset = get_local_offset(&state.local_timezone).unwrap();

        set_auth_cookie(jar, UserID::new(7), state.cookie_duration, local_offset)
    }

    async fn stub_log_out(jar: PrivateCookieJar) -> PrivateCookieJar {
        invalidate_auth_cookie(jar)
    }

    fn get_test_server(cookie_duration: Duration) -> TestServer {
        let hash = sha2::Sha512::digest("nafstenoas");
        let state = SessionState {
            cookie_key: Key::from(&hash),
            cookie_duration,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let app = Router::new()
            .route("/whoami", get(whoami))
            .route("/log_in", post(stub_log_in))
            .route("/log_out", post(stub_log_out))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                refresh_session,
            ))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {:?}, want {:?}",
            left,
            right
        );
    }

    #[tokio::test]
    async fn request_without_cookie_is_guest() {
        let server = get_test_server(Duration::minutes(5));

        let response = server.get("/whoami").await;

        response.assert_status_ok();
        response.assert_text("guest");
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_none());
    }

    #[tokio::test]
    async fn request_with_garbled_cookie_is_guest() {
        let server = get_test_server(Duration::minutes(5));

        let response = server
            .get("/whoami")
            .add_cookie(Cookie::build((COOKIE_TOKEN, "FOOBAR")).build())
            .await;

        response.assert_text("guest");
    }

    #[tokio::test]
    async fn request_with_valid_cookie_is_signed_in() {
        let server = get_test_server(Duration::minutes(5));
        let token_cookie = server.post("/log_in").await.cookie(COOKIE_TOKEN);

        let response = server.get("/whoami").add_cookie(token_cookie).await;

        response.assert_text("7");
    }

    #[tokio::test]
    async fn refresh_session_extends_valid_cookie() {
        let server = get_test_server(Duration::seconds(5));
        let token_cookie = server.post("/log_in").await.cookie(COOKIE_TOKEN);
        let response_time = OffsetDateTime::now_utc();
        assert_date_time_close(
            token_cookie.expires_datetime().unwrap(),
            response_time + Duration::seconds(5),
        );

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let response = server.get("/whoami").add_cookie(token_cookie).await;

        let auth_cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            auth_cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + Duration::seconds(5),
        );
        assert!(auth_cookie.expires_datetime().unwrap() > response_time + Duration::seconds(5));
        assert_eq!(auth_cookie.secure(), Some(true));
        assert_eq!(auth_cookie.http_only(), Some(true));
        assert_eq!(auth_cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn refresh_session_does_not_undo_log_out() {
        let server = get_test_server(Duration::minutes(5));
        let token_cookie = server.post("/log_in").await.cookie(COOKIE_TOKEN);

        let response = server.post("/log_out").add_cookie(token_cookie).await;

        let cookies: Vec<_> = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .collect();
        assert_eq!(cookies.len(), 1, "want a single set-cookie header, got {cookies:?}");
        assert_eq!(
            response.cookie(COOKIE_TOKEN).max_age(),
            Some(Duration::ZERO)
        );
    }
}
