//! Binary encoding of session state.
//!
//! The on-disk representation is the bincode encoding of the full state
//! map. Enum tags on [`SessionValue`] make the stream self-describing:
//! every value carries enough type information to be reconstructed.
//! Structured records additionally name their Rust type, and that name
//! must be registered here before decode; an unregistered record type in
//! a stored session is a decode error, never silently dropped data.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::value::{Record, SessionValue};

/// The full key/value state of one session.
pub type SessionData = HashMap<String, SessionValue>;

/// Process-wide registry of record type names, in the spirit of a
/// self-describing stream's type table.
static RECORD_TYPES: Lazy<RwLock<HashSet<&'static str>>> =
    Lazy::new(|| RwLock::new(HashSet::new()));

/// Register a record type so stored sessions containing it can be decoded.
///
/// Call once per type before reconstructing any session that may hold it,
/// typically at startup. Registration is idempotent.
pub fn register<T: Record>() {
    let newly = RECORD_TYPES.write().insert(T::TYPE_NAME);
    if newly {
        debug!(type_name = T::TYPE_NAME, "Registered record type");
    }
}

fn is_registered(type_name: &str) -> bool {
    RECORD_TYPES.read().contains(type_name)
}

/// Encode a state map to its binary form.
pub fn encode(data: &SessionData) -> SessionResult<Vec<u8>> {
    bincode::serialize(data).map_err(|e| SessionError::Encode(e.to_string()))
}

/// Decode a binary blob back into a state map.
///
/// Fails on malformed or truncated input, and on any record whose type
/// was never registered.
pub fn decode(bytes: &[u8]) -> SessionResult<SessionData> {
    let data: SessionData =
        bincode::deserialize(bytes).map_err(|e| SessionError::Decode(e.to_string()))?;

    for value in data.values() {
        if let SessionValue::Record(record) = value {
            if !is_registered(&record.type_name) {
                return Err(SessionError::Decode(format!(
                    "unregistered record type `{}`",
                    record.type_name
                )));
            }
        }
    }

    Ok(data)
}
