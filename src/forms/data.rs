//! Form input sources.
//!
//! # Responsibilities
//! - Define the multi-value lookup capability fields read from
//! - Decode form-encoded request bodies into an ordered multi-map
//! - Bundle body, session and live CSRF settings into one extractor
//!
//! # Design Decisions
//! - CSRF protection needs a session, so only a full [`FormRequest`] can carry it;
//!   plain data sources are a separate [`FormInput`] variant
//! - GET/HEAD requests have no form body; their query string is not form data

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::Method,
    Form,
};

use crate::config::SharedConfig;
use crate::error::AppError;
use crate::session::SessionHandle;

/// Something fields can read submitted values from.
pub trait MultiValueLookup {
    /// Every value submitted under `name`, in submission order.
    fn get_all(&self, name: &str) -> Vec<&str>;

    fn get_first(&self, name: &str) -> Option<&str> {
        self.get_all(name).into_iter().next()
    }

    fn contains(&self, name: &str) -> bool {
        self.get_first(name).is_some()
    }
}

/// Ordered `(name, value)` pairs; a name may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiDict {
    pairs: Vec<(String, String)>,
}

impl MultiDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl MultiValueLookup for MultiDict {
    fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// A request as seen by a form: its method, decoded body and session.
#[derive(Debug, Clone)]
pub struct FormRequest {
    pub method: Method,
    pub form: MultiDict,
    pub session: SessionHandle,
    /// Token bound in effect when the request arrived.
    pub csrf_tokens: i64,
}

impl FormRequest {
    /// Whether the request carries a submission rather than asking for a blank form.
    pub fn is_submission(&self) -> bool {
        !matches!(self.method, Method::GET | Method::HEAD)
    }
}

impl<S> FromRequest<S> for FormRequest
where
    S: Send + Sync,
    SharedConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let csrf_tokens = SharedConfig::from_ref(state).load().forms.csrf_tokens;

        let (mut parts, body) = req.into_parts();
        let session = SessionHandle::from_request_parts(&mut parts, state).await?;
        let method = parts.method.clone();

        let form = if matches!(method, Method::GET | Method::HEAD) {
            MultiDict::new()
        } else {
            let req = Request::from_parts(parts, body);
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadForm(rejection.body_text()))?;
            MultiDict::from_pairs(pairs)
        };

        Ok(Self {
            method,
            form,
            session,
            csrf_tokens,
        })
    }
}

/// What a form is processed from.
pub enum FormInput<'a> {
    /// A full request; the only input that supports CSRF protection.
    Request(&'a FormRequest),
    /// Bare form data without a session.
    Data(&'a dyn MultiValueLookup),
    /// Nothing submitted; fields fall back to defaults.
    Empty,
}
