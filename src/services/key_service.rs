//! Capability-key derivation and lookup.
//!
//! record/upload issues the client a key that authorizes the follow-up
//! bulk GPS upload for exactly that record. The key value is a SHA-256
//! digest over the owner and the record id, but its authority comes from
//! the row registered in `key_to_record`, not from recomputation: an
//! unregistered (or invalidated) key authorizes nothing.

use crate::{db::DbPool, error::AppError, models::key_to_record::KeyToRecord};
use sha2::{Digest, Sha256};

/// Derive the capability key for a record.
///
/// `lowercase-hex(SHA-256(UTF-8(user_id) ∥ UTF-8(decimal(record_id))))`,
/// where the decimal rendering has no sign and no leading zeros.
pub fn derive_key(user_id: &str, record_id: i32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(record_id.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Look up a live capability key.
///
/// Returns `None` for unknown (or already invalidated) keys; gps/upload
/// translates that into 401.
pub async fn find(pool: &DbPool, key: &str) -> Result<Option<KeyToRecord>, AppError> {
    let entry = sqlx::query_as::<_, KeyToRecord>(
        "SELECT key, record_id, user_id FROM key_to_record WHERE key = $1",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Invalidate a capability key.
///
/// Deleting an unknown key is not an error; gps/invalidate-key answers
/// 202 either way.
pub async fn delete(pool: &DbPool, key: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM key_to_record WHERE key = $1")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}
