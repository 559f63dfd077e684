//! Hello World web application with CSRF-aware form handling.

pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;

pub use config::schema::AppConfig;
pub use error::AppError;
pub use forms::{CsrfToken, CsrfTokenManager, Form, FormInput};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use session::{MemoryStore, Session, SessionHandle, SessionStore};
