//! Cycling record model and record request/response types.

use serde::{Deserialize, Serialize};

/// Represents a cycling session record from the database.
///
/// # Database Table
///
/// Maps to the `cycling_record` table. `record_id` is a server-assigned
/// surrogate key; the natural key is (user_id, device_id, date_time),
/// which carries a UNIQUE constraint so a session exists at most once.
///
/// Session timestamps travel as opaque strings: the server never parses
/// them, it only stores and compares them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CyclingRecord {
    pub record_id: i32,
    pub user_id: String,
    pub device_id: String,
    pub date_time: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    /// Ride duration in seconds
    pub total_time: i32,
    pub distance: f64,
    pub ave_speed: f64,
    pub max_speed: f64,
}

/// Request body for record/upload: credentials plus the session metrics.
///
/// ```json
/// {
///   "userId": "alice", "password": "p",
///   "deviceId": "d1", "dateTime": "2024-01-01T00:00:00",
///   "date": "2024-01-01", "startTime": "00:00", "endTime": "01:00",
///   "totalTime": 3600, "distance": 10.0, "aveSpeed": 10.0, "maxSpeed": 20.0
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecordRequest {
    pub user_id: String,
    pub password: String,
    pub device_id: String,
    pub date_time: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_time: i32,
    pub distance: f64,
    pub ave_speed: f64,
    pub max_speed: f64,
}

/// Response body for record/upload: the capability key the client must
/// present to gps/upload.
#[derive(Debug, Serialize)]
pub struct UploadRecordResponse {
    pub key: String,
}

/// Request body for record/delete.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordRequest {
    pub user_id: String,
    pub password: String,
    pub record_id: i32,
}

/// One record as returned by record/download: every stored field, there
/// is no password on a record to withhold.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub record_id: i32,
    pub user_id: String,
    pub device_id: String,
    pub date_time: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub total_time: i32,
    pub distance: f64,
    pub ave_speed: f64,
    pub max_speed: f64,
}

impl From<CyclingRecord> for RecordResponse {
    fn from(record: CyclingRecord) -> Self {
        Self {
            record_id: record.record_id,
            user_id: record.user_id,
            device_id: record.device_id,
            date_time: record.date_time,
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            total_time: record.total_time,
            distance: record.distance,
            ave_speed: record.ave_speed,
            max_speed: record.max_speed,
        }
    }
}
