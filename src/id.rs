//! Session identifier generation.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::ID_LENGTH;
use crate::error::{SessionError, SessionResult};
use crate::store::{session_path, FileStore};

/// Collision retries before giving up. With 128-bit identifiers even a
/// single retry is astronomically unlikely; the cap exists so a broken
/// storage directory cannot send generation into an unbounded loop.
const MAX_ATTEMPTS: u32 = 8;

/// Generate a fresh identifier with no storage file on disk.
///
/// The candidate is a SHA-256 digest over the current unix timestamp and
/// 1024 bytes from the OS entropy source, hex-encoded and truncated to
/// 32 characters (128 bits, long enough that guessing is infeasible and
/// short enough for a filename). A candidate whose storage file already
/// exists is discarded and generation retried; the identifier returned is
/// always the one that passed the collision probe.
pub(crate) async fn generate_id() -> SessionResult<String> {
    for attempt in 0..MAX_ATTEMPTS {
        let id = random_id()?;
        if !FileStore.exists(&session_path(&id)).await? {
            if attempt > 0 {
                debug!(attempt, "Identifier collision resolved on retry");
            }
            return Ok(id);
        }
    }

    Err(SessionError::Generation(format!(
        "no unused identifier after {MAX_ATTEMPTS} attempts"
    )))
}

/// Whether `value` has the shape of a generated identifier: exactly 32
/// lowercase hex characters. Nothing else can name a storage file, so
/// cookie values failing this never reach the filesystem layer.
pub(crate) fn is_valid_id(value: &str) -> bool {
    value.len() == ID_LENGTH && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// One identifier candidate from timestamp plus CSPRNG entropy.
///
/// Entropy failure is fatal: an identifier is never derived from a weaker
/// source than the OS CSPRNG.
fn random_id() -> SessionResult<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| SessionError::Generation(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(now.as_secs().to_string().as_bytes());

    let mut entropy = [0u8; 1024];
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| SessionError::Generation(format!("entropy source unavailable: {e}")))?;
    hasher.update(entropy);

    let digest = hex::encode(hasher.finalize());
    Ok(digest[..ID_LENGTH].to_string())
}
