//! Form handling subsystem.
//!
//! # Data Flow
//! ```text
//! FormRequest (method, decoded body, session, csrf_tokens)
//!     → form.rs (Form::process)
//!         → csrf.rs (issue fresh token into session list, FIFO-bounded)
//!         → fields.rs (populate each field from data.rs lookup)
//!     → form.rs (Form::validate)
//!         → validators.rs (per-field checks)
//!         → csrf.rs (submitted token ∈ session list)
//!     → widgets.rs (HTML for re-render, hidden token input)
//! ```
//!
//! # Design Decisions
//! - CSRF protection is opt-in per form
//! - Tokens are checked by membership only; they are not consumed
//! - Asking for CSRF protection without a request is a caller error, not a failed check

pub mod csrf;
pub mod data;
pub mod fields;
pub mod form;
pub mod validators;
pub mod widgets;

pub use csrf::{CsrfToken, CsrfTokenManager, CSRF_FIELD_NAME, CSRF_SESSION_KEY};
pub use data::{FormInput, FormRequest, MultiDict, MultiValueLookup};
pub use fields::{Field, FieldKind};
pub use form::{Form, FormError, CSRF_ERROR_MESSAGE};
pub use validators::{ValidationError, Validator};
