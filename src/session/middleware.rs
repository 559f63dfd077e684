//! Cookie-based session middleware.
//!
//! Loads the session named by the request cookie (or starts a new one),
//! exposes it to handlers as a [`SessionHandle`] extension, and after the
//! handler returns persists the session if it was written to.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use cookie::{Cookie, SameSite};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::AppError;
use crate::http::server::AppState;
use crate::session::store::Session;

/// Shared handle to the current request's session.
#[derive(Debug, Clone)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    /// Lock the session for reading or writing. Do not hold across `.await`.
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().expect("session mutex poisoned")
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }
}

impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or(AppError::SessionMissing)
    }
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let config = state.config.load();
    let cookie_config = &config.session;

    let (id, session) = session_id_from_headers(request.headers(), &cookie_config.cookie_name)
        .and_then(|id| state.sessions.load(&id).map(|session| (id, session)))
        .unwrap_or_else(|| (new_session_id(), Session::new()));

    let handle = SessionHandle::new(session);
    request.extensions_mut().insert(handle.clone());

    let mut response = next.run(request).await;

    let session = handle.snapshot();
    if !session.is_modified() {
        return response;
    }

    state.sessions.save(&id, &session);
    tracing::debug!(session_id = %id, new = session.is_new(), keys = session.len(), "Session saved");

    if session.is_new() || cookie_config.max_age_secs.is_some() {
        let cookie = build_cookie(cookie_config, &id);
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Session cookie is not a valid header value"),
        }
    }

    response
}

fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn session_id_from_headers(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

fn build_cookie(config: &SessionConfig, id: &str) -> Cookie<'static> {
    let mut builder = Cookie::build((config.cookie_name.clone(), id.to_string()))
        .path(config.cookie_path.clone())
        .secure(config.secure)
        .http_only(config.http_only)
        .same_site(SameSite::Lax);

    if let Some(domain) = &config.cookie_domain {
        builder = builder.domain(domain.clone());
    }
    if let Some(secs) = config.max_age_secs {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        builder = builder.max_age(cookie::time::Duration::seconds(secs));
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; session=abc123; other=1"));
        assert_eq!(session_id_from_headers(&headers, "session").as_deref(), Some("abc123"));
        assert_eq!(session_id_from_headers(&headers, "missing"), None);
    }

    #[test]
    fn test_session_id_across_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("sid=xyz"));
        assert_eq!(session_id_from_headers(&headers, "sid").as_deref(), Some("xyz"));
    }

    #[test]
    fn test_build_cookie_attributes() {
        let mut config = SessionConfig::default();
        config.cookie_domain = Some("example.com".into());
        config.max_age_secs = Some(60);
        config.secure = true;

        let cookie = build_cookie(&config, "id1");
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "id1");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::seconds(60)));
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(new_session_id(), new_session_id());
    }
}
