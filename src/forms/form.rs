//! Forms with optional CSRF protection.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::forms::csrf::{CsrfToken, CsrfTokenManager, CSRF_FIELD_NAME};
use crate::forms::data::{FormInput, MultiValueLookup};
use crate::forms::fields::Field;
use crate::forms::widgets;
use crate::observability::metrics;
use crate::session::SessionHandle;

/// Message recorded when the submitted token is unknown or evicted.
pub const CSRF_ERROR_MESSAGE: &str = "Invalid or expired form token.";

/// Misuse of the form API by the caller.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("You must pass a request object to the form to use CSRF protection")]
    CsrfRequiresRequest,
}

struct CsrfBinding {
    session: SessionHandle,
    issued: CsrfToken,
    submitted: Option<String>,
}

pub struct Form {
    fields: Vec<Field>,
    csrf_protection: bool,
    csrf: Option<CsrfBinding>,
    csrf_errors: Vec<String>,
}

impl Form {
    /// An empty form with CSRF protection off.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            csrf_protection: false,
            csrf: None,
            csrf_errors: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn csrf_protection(mut self, enabled: bool) -> Self {
        self.csrf_protection = enabled;
        self
    }

    pub fn is_csrf_protected(&self) -> bool {
        self.csrf_protection
    }

    /// Populate fields from `input`.
    ///
    /// With CSRF protection on, a fresh token is issued into the request's
    /// session and the submitted one is remembered for [`Form::validate`].
    pub fn process(&mut self, input: FormInput<'_>) -> Result<(), FormError> {
        self.csrf = None;
        self.csrf_errors.clear();

        let formdata: Option<&dyn MultiValueLookup> = match input {
            FormInput::Request(request) => {
                if self.csrf_protection {
                    let issued = {
                        let mut session = request.session.lock();
                        CsrfTokenManager::issue(&mut session, request.csrf_tokens)
                    };
                    metrics::record_csrf_issued();
                    self.csrf = Some(CsrfBinding {
                        session: request.session.clone(),
                        issued,
                        submitted: request.form.get_first(CSRF_FIELD_NAME).map(str::to_owned),
                    });
                }
                Some(&request.form)
            }
            FormInput::Data(data) => {
                if self.csrf_protection {
                    return Err(FormError::CsrfRequiresRequest);
                }
                Some(data)
            }
            FormInput::Empty => {
                if self.csrf_protection {
                    return Err(FormError::CsrfRequiresRequest);
                }
                None
            }
        };

        for field in &mut self.fields {
            field.process(formdata);
        }
        Ok(())
    }

    /// Validate every field and, when protected, the submitted CSRF token.
    pub fn validate(&mut self) -> bool {
        let mut valid = true;
        for field in &mut self.fields {
            valid &= field.validate();
        }

        self.csrf_errors.clear();
        if self.csrf_protection {
            let accepted = self.csrf.as_ref().is_some_and(|binding| {
                binding.submitted.as_deref().is_some_and(|submitted| {
                    CsrfTokenManager::validate(&binding.session.lock(), submitted)
                })
            });
            if !accepted {
                tracing::warn!("Rejected form submission with invalid CSRF token");
                metrics::record_csrf_rejected();
                self.csrf_errors.push(CSRF_ERROR_MESSAGE.to_owned());
                valid = false;
            }
        }

        valid
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Error messages by field name; the CSRF check reports under `csrf_token`.
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut errors: BTreeMap<String, Vec<String>> = self
            .fields
            .iter()
            .filter(|f| !f.errors().is_empty())
            .map(|f| (f.name().to_owned(), f.errors().to_vec()))
            .collect();
        if !self.csrf_errors.is_empty() {
            errors.insert(CSRF_FIELD_NAME.to_owned(), self.csrf_errors.clone());
        }
        errors
    }

    pub fn csrf_errors(&self) -> &[String] {
        &self.csrf_errors
    }

    /// The token issued by the last [`Form::process`], if protected.
    pub fn csrf_token(&self) -> Option<&CsrfToken> {
        self.csrf.as_ref().map(|binding| &binding.issued)
    }

    /// Hidden input for the issued token; empty when unprotected.
    pub fn csrf_field(&self) -> String {
        self.csrf_token()
            .map(|token| widgets::hidden(CSRF_FIELD_NAME, token.as_str()))
            .unwrap_or_default()
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}
