//! Capability-key mapping model.
//!
//! A row here is a live capability: whoever presents `key` may upload GPS
//! data for `record_id`. Rows are created inside the record-upload
//! transaction and removed only by gps/invalidate-key.

/// Represents a capability-key row from the `key_to_record` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct KeyToRecord {
    /// 64 lowercase hex characters, primary key
    pub key: String,

    /// Record this key grants GPS upload for
    pub record_id: i32,

    /// Owner of the record at the time the key was issued
    pub user_id: String,
}
