//! GPS trace HTTP handlers.
//!
//! - POST /gps/upload - bulk-insert samples, authenticated by capability key
//! - POST /gps/download - fetch one owned record's trace
//! - POST /gps/invalidate-key - retire a capability key

use crate::{
    db::DbPool,
    error::AppError,
    models::gps::{DownloadGpsRequest, DownloadGpsResponse, InvalidateKeyRequest, UploadGpsRequest},
    services::{gps_service, key_service, record_service, user_service},
};
use axum::{Json, extract::State, http::StatusCode};

/// Upload a batch of GPS samples.
///
/// # Authentication
///
/// Possession of the capability key issued by record/upload is the sole
/// authentication: no user credentials appear in this request. The key is
/// not consumed; further batches against the same key append to the trace.
///
/// # Response
///
/// - **202 Accepted**: whole batch stored
/// - **401**: unknown or invalidated key
/// - **406**: a sample was rejected (including the stale-key case where
///   the bound record was replaced or deleted, which fails on the FK);
///   the batch is all-or-nothing, so nothing of it was stored
pub async fn upload_gps_data(
    State(pool): State<DbPool>,
    Json(request): Json<UploadGpsRequest>,
) -> Result<StatusCode, AppError> {
    let entry = key_service::find(&pool, &request.key)
        .await?
        .ok_or(AppError::AuthFailed)?;

    gps_service::insert_batch(&pool, entry.record_id, &request.data).await?;
    tracing::info!(record_id = entry.record_id, samples = request.data.len(), "gps batch stored");

    Ok(StatusCode::ACCEPTED)
}

/// Download the full GPS trace of one owned record.
///
/// # Response (200 OK)
///
/// ```json
/// { "recordId": 7, "data": [ { "latitude": 35.0, "longitude": 139.0, ... } ] }
/// ```
///
/// Samples come back in upload order with exactly the fields they were
/// uploaded with.
///
/// # Errors
///
/// - **401**: credentials did not match
/// - **403**: record missing or not the caller's
pub async fn download_gps_data(
    State(pool): State<DbPool>,
    Json(request): Json<DownloadGpsRequest>,
) -> Result<Json<DownloadGpsResponse>, AppError> {
    if !user_service::authenticate(&pool, &request.user_id, &request.password).await? {
        return Err(AppError::AuthFailed);
    }

    let record = record_service::find_one(&pool, request.record_id).await?;
    match record {
        Some(record) if record.user_id == request.user_id => {
            let samples = gps_service::find_by_record_id(&pool, record.record_id).await?;
            Ok(Json(DownloadGpsResponse {
                record_id: record.record_id,
                data: samples.into_iter().map(Into::into).collect(),
            }))
        }
        _ => Err(AppError::Forbidden),
    }
}

/// Invalidate a capability key.
///
/// Answers **202 Accepted** whether or not the key existed; afterwards any
/// gps/upload with it fails 401.
pub async fn invalidate_key(
    State(pool): State<DbPool>,
    Json(request): Json<InvalidateKeyRequest>,
) -> Result<StatusCode, AppError> {
    key_service::delete(&pool, &request.key).await?;

    Ok(StatusCode::ACCEPTED)
}
