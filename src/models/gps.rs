//! GPS sample model, wire element, and gps request/response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents one GPS sample row from the database.
///
/// # Database Table
///
/// Maps to the `gps_data` table. `record_id` references `cycling_record`
/// with ON DELETE CASCADE, so a record's trace disappears with the record
/// and a late insert against a deleted record fails on the FK.
///
/// The typed columns are nullable and `extra` keeps everything else the
/// client sent, so an uploaded element comes back from gps/download with
/// exactly the fields it arrived with.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GpsData {
    pub id: i64,
    pub record_id: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub timestamp: Option<String>,
    /// Additional client-supplied sample fields, stored as JSONB
    pub extra: Value,
}

/// One GPS sample on the wire.
///
/// ```json
/// { "latitude": 35.0, "longitude": 139.0, "altitude": 0.0,
///   "speed": 0.0, "timestamp": "2024-01-01T00:00:01" }
/// ```
///
/// Unknown fields are collected into `extra` via `#[serde(flatten)]` and
/// round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<GpsData> for GpsElement {
    fn from(data: GpsData) -> Self {
        Self {
            latitude: data.latitude,
            longitude: data.longitude,
            altitude: data.altitude,
            speed: data.speed,
            timestamp: data.timestamp,
            extra: match data.extra {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }
}

/// Request body for gps/upload. The key is the sole authentication.
#[derive(Debug, Deserialize)]
pub struct UploadGpsRequest {
    pub key: String,
    pub data: Vec<GpsElement>,
}

/// Request body for gps/download.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGpsRequest {
    pub user_id: String,
    pub password: String,
    pub record_id: i32,
}

/// Response body for gps/download: the record's full trace in insertion
/// order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGpsResponse {
    pub record_id: i32,
    pub data: Vec<GpsElement>,
}

/// Request body for gps/invalidate-key.
#[derive(Debug, Deserialize)]
pub struct InvalidateKeyRequest {
    pub key: String,
}
