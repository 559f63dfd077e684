//! Per-session CSRF token lifecycle.
//!
//! Every protected form render issues a fresh token and appends it to a
//! bounded list kept in the session. A submission is accepted when its token
//! is still in that list. Tokens are never consumed: they stay valid until
//! pushed out by newer ones (oldest first) or until the session ends.

use std::fmt;

use serde_json::Value;
use uuid::Uuid;

use crate::session::Session;

/// Session key holding the list of outstanding tokens.
pub const CSRF_SESSION_KEY: &str = "_csrf_token";

/// Name of the form field carrying the token.
pub const CSRF_FIELD_NAME: &str = "csrf_token";

/// A CSRF token.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Generate a new random token (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a token from an existing string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CsrfToken").field(&"***").finish()
    }
}

impl fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues and checks the tokens stored in a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsrfTokenManager;

impl CsrfTokenManager {
    /// Issue a fresh token, keeping at most `max_tokens` in the session.
    pub fn issue(session: &mut Session, max_tokens: i64) -> CsrfToken {
        let token = CsrfToken::generate();
        Self::push(session, &token, max_tokens);
        token
    }

    /// True iff `submitted` is one of the session's outstanding tokens.
    pub fn validate(session: &Session, submitted: &str) -> bool {
        let Some(tokens) = session.get_value(CSRF_SESSION_KEY).and_then(Value::as_array) else {
            return false;
        };
        tokens.iter().all(Value::is_string) && tokens.iter().any(|t| t.as_str() == Some(submitted))
    }

    /// Outstanding tokens, oldest first. Absent or malformed lists read as empty.
    pub fn outstanding(session: &Session) -> Vec<String> {
        session.get(CSRF_SESSION_KEY).unwrap_or_default()
    }

    fn push(session: &mut Session, token: &CsrfToken, max_tokens: i64) {
        let mut tokens = Self::outstanding(session);
        tokens.push(token.as_str().to_owned());

        let limit = usize::try_from(max_tokens).unwrap_or(0);
        let evicted = tokens.len().saturating_sub(limit);
        tokens.drain(..evicted);

        tracing::debug!(outstanding = tokens.len(), evicted, "Issued CSRF token");
        session.insert(CSRF_SESSION_KEY, tokens);
    }
}
