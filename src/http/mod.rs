//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → session middleware (load session by cookie)
//!     → handlers.rs (hello world, pretty hello world, contact form)
//!     → templates.rs (Tera rendering)
//!     → session middleware (save session, set cookie)
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;
pub mod templates;

pub use server::{AppState, HttpServer};
pub use templates::Templates;
