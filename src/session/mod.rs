//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (Cookie: session=<id>)
//!     → middleware.rs (look up id, or start a new session)
//!     → store.rs (SessionStore::load)
//!     → SessionHandle inserted into request extensions
//!     → handler reads/writes the session
//!     → middleware.rs saves modified sessions, sets cookie for new ones
//! ```
//!
//! # Design Decisions
//! - Server-side storage; the cookie only carries a random id
//! - Untouched sessions are never stored and never get a cookie
//! - Storage is behind a trait so other backends can be plugged in

pub mod middleware;
pub mod store;

pub use middleware::{session_middleware, SessionHandle};
pub use store::{MemoryStore, Session, SessionStore};
