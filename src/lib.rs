//! File-backed cookie sessions.
//!
//! Issues an opaque per-client identifier via an HTTP cookie, keeps
//! arbitrary key/value state for that identifier in memory, and persists
//! it as a self-describing binary blob in one file per session. The
//! engine owns identifier generation, the session object and its mutation
//! API, the state codec, and the file lifecycle; the HTTP transport is a
//! collaborator adapted through the lightweight [`HttpRequest`] /
//! [`HttpResponse`] carriers in [`http`].
//!
//! # Lifecycle
//!
//! A request without a valid cookie creates a session (identifier
//! generated, cookie emitted); requests carrying the cookie reconstruct
//! it (file read, state decoded); handlers mutate the in-memory map;
//! end-of-request persists it (state encoded, file written); logout
//! destroys it (file deleted, cookie expired).
//!
//! # Example
//!
//! ```no_run
//! use filesession::{CookieOptions, HttpRequest, HttpResponse, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), filesession::SessionError> {
//!     // Login: no cookie yet, start a session.
//!     let mut res = HttpResponse::ok();
//!     let mut session = Session::create(
//!         &mut res,
//!         CookieOptions::new().with_path("/").with_http_only(true),
//!     )
//!     .await?;
//!
//!     session.set("user_id", 1001);
//!     session.set("name", "John Doe");
//!     session.persist().await?;
//!
//!     // Later request: the client replays the cookie.
//!     let req = HttpRequest::new()
//!         .with_header("Cookie", format!("GSESSIONID={}", session.id()));
//!     let session = Session::reconstruct(&req).await?;
//!     assert_eq!(session.get("user_id").unwrap().as_int(), Some(1001));
//!
//!     // Logout.
//!     let mut res = HttpResponse::ok();
//!     session.destroy(&mut res).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Structured values
//!
//! Besides integers, floats, booleans, and strings, any serde type can be
//! stored as a record once it implements [`Record`] and is registered
//! with [`codec::register`] before sessions holding it are decoded.
//!
//! # Limitations
//!
//! Storage is a single flat directory owned by one process; writes to a
//! path are serialized within the process only. Sharing the directory
//! between processes requires external advisory locking. The stored blob
//! is neither encrypted nor signed, and the cookie is not tamper-proofed.

pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod value;

mod id;

pub use config::{CookieOptions, COOKIE_NAME};
pub use error::{SessionError, SessionResult};
pub use http::{Cookie, HttpRequest, HttpResponse};
pub use session::Session;
pub use store::FileStore;
pub use value::{Record, RecordValue, SessionValue};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::codec::{register, SessionData};
    pub use crate::config::{CookieOptions, COOKIE_NAME};
    pub use crate::error::{SessionError, SessionResult};
    pub use crate::http::{Cookie, HttpRequest, HttpResponse};
    pub use crate::session::Session;
    pub use crate::value::{Record, RecordValue, SessionValue};
}
