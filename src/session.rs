//! Session lifecycle and mutation API.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::{self, SessionData};
use crate::config::{CookieOptions, COOKIE_NAME};
use crate::error::{SessionError, SessionResult};
use crate::http::{Cookie, HttpRequest, HttpResponse};
use crate::id;
use crate::store::{session_path, FileStore};
use crate::value::{Record, SessionValue};

/// One client's in-memory key/value state plus its cookie configuration.
///
/// State lives only in memory until [`persist`](Session::persist) writes
/// it to the storage file; mutations made after the last persist are lost
/// on a crash. [`destroy`](Session::destroy) consumes the session, so no
/// operation can be issued against a destroyed identifier through this
/// handle; reconstructing it afterwards fails with
/// [`SessionError::NotFound`].
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    file_path: PathBuf,
    options: CookieOptions,
    data: SessionData,
    store: FileStore,
}

impl Session {
    /// Create a fresh session with empty state and emit its cookie onto
    /// `res`.
    pub async fn create(res: &mut HttpResponse, options: CookieOptions) -> SessionResult<Session> {
        let id = id::generate_id().await?;
        let file_path = session_path(&id);

        let session = Session {
            id,
            file_path,
            options,
            data: SessionData::new(),
            store: FileStore,
        };

        res.set_cookie(&Cookie::new(
            COOKIE_NAME,
            &session.id,
            session.options.clone(),
        ));

        info!(id = %session.id, "Created session");
        Ok(session)
    }

    /// Rebuild a session from the cookie on `req` and its stored state.
    ///
    /// Fails with [`SessionError::NoSession`] when the request carries no
    /// session cookie, [`SessionError::NotFound`] when the storage file is
    /// gone (never persisted, or destroyed), and
    /// [`SessionError::Decode`] on malformed stored bytes. Cookie
    /// attributes come from the cookie the client actually presented, not
    /// from a fresh default.
    ///
    /// A cookie value without identifier shape (32 lowercase hex chars)
    /// cannot correlate to a storage file and fails with
    /// [`SessionError::NotFound`] before any path is derived, so no
    /// untrusted input reaches the filesystem layer.
    pub async fn reconstruct(req: &HttpRequest) -> SessionResult<Session> {
        let cookie = req.cookie(COOKIE_NAME).ok_or(SessionError::NoSession)?;
        if cookie.value.is_empty() {
            return Err(SessionError::NoSession);
        }
        if !id::is_valid_id(&cookie.value) {
            return Err(SessionError::NotFound(cookie.value));
        }

        let file_path = session_path(&cookie.value);
        let store = FileStore;

        let bytes = store.read(&file_path).await?;
        let data = codec::decode(&bytes)?;

        debug!(id = %cookie.value, entries = data.len(), "Reconstructed session");

        Ok(Session {
            id: cookie.value,
            file_path,
            options: cookie.options,
            data,
            store,
        })
    }

    /// The opaque identifier correlating this session to its cookie.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the cookie carrying the identifier.
    pub fn name(&self) -> &str {
        COOKIE_NAME
    }

    /// Path of the storage file backing this session.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Cookie attributes reused on every cookie write for this session.
    pub fn options(&self) -> &CookieOptions {
        &self.options
    }

    /// Insert or overwrite a value. In-memory only; takes effect on disk
    /// at the next [`persist`](Session::persist).
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SessionValue>) {
        self.data.insert(key.into(), value.into());
    }

    /// Insert or overwrite a structured record.
    pub fn set_record<T: Record>(&mut self, key: impl Into<String>, value: &T) -> SessionResult<()> {
        self.data.insert(key.into(), SessionValue::record(value)?);
        Ok(())
    }

    /// Look up a value. Absent keys are `None`, not an error.
    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.data.get(key)
    }

    /// Look up and decode a structured record.
    pub fn get_record<T: Record>(&self, key: &str) -> SessionResult<Option<T>> {
        match self.data.get(key) {
            Some(value) => Ok(Some(value.as_record::<T>()?)),
            None => Ok(None),
        }
    }

    /// Remove a key, returning its value. No-op when absent.
    pub fn remove(&mut self, key: &str) -> Option<SessionValue> {
        self.data.remove(key)
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// All keys currently in the session.
    pub fn keys(&self) -> Vec<&String> {
        self.data.keys().collect()
    }

    /// Drop all in-memory state.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Encode the current state and write it to the storage file.
    ///
    /// The write holds the path's lock, so a concurrent reader of the same
    /// identifier never observes partial content. On failure the on-disk
    /// state is whatever the last successful persist left.
    pub async fn persist(&self) -> SessionResult<()> {
        let bytes = codec::encode(&self.data)?;
        self.store.write(&self.file_path, &bytes).await?;

        debug!(id = %self.id, size = bytes.len(), "Persisted session");
        Ok(())
    }

    /// Delete the storage file and emit an immediately expiring cookie.
    ///
    /// Consumes the session: the identifier is terminal after this call.
    /// Fails with [`SessionError::NotFound`] when the file was already
    /// gone: a double destroy is a usage error worth surfacing, not
    /// something to swallow.
    pub async fn destroy(self, res: &mut HttpResponse) -> SessionResult<()> {
        let expiring = CookieOptions {
            path: self.options.path.clone(),
            domain: self.options.domain.clone(),
            max_age: -1,
            secure: false,
            http_only: true,
        };
        res.set_cookie(&Cookie::new(COOKIE_NAME, "", expiring));

        self.store.delete(&self.file_path).await?;

        info!(id = %self.id, "Destroyed session");
        Ok(())
    }
}
