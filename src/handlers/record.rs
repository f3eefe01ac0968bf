//! Cycling record HTTP handlers.
//!
//! - POST /record/upload - store one session record, issue a capability key
//! - POST /record/download - list the caller's records
//! - POST /record/delete - delete one owned record

use crate::{
    db::DbPool,
    error::AppError,
    models::record::{
        DeleteRecordRequest, RecordResponse, UploadRecordRequest, UploadRecordResponse,
    },
    models::user::AccountRequest,
    services::{record_service, user_service},
};
use axum::{Json, extract::State, http::StatusCode};

/// Upload one cycling session record.
///
/// # Response (202 Accepted)
///
/// ```json
/// { "key": "8f3c9713f8dde0960b3375edbc3aebda35ebc7bc721085a115d14852520578df" }
/// ```
///
/// The key authorizes the follow-up gps/upload for this record and stays
/// valid until the client calls gps/invalidate-key.
///
/// # Errors
///
/// - **401**: credentials did not match
/// - **406**: the insert (or the key registration) was rejected
///
/// Re-uploading the same session (same userId, deviceId, dateTime)
/// replaces the earlier record and drops its GPS trace, so an interrupted
/// upload can simply be retried from the top.
pub async fn upload_record(
    State(pool): State<DbPool>,
    Json(request): Json<UploadRecordRequest>,
) -> Result<(StatusCode, Json<UploadRecordResponse>), AppError> {
    if !user_service::authenticate(&pool, &request.user_id, &request.password).await? {
        return Err(AppError::AuthFailed);
    }

    let key = record_service::upload(&pool, &request).await?;
    tracing::info!(user_id = %request.user_id, device_id = %request.device_id, "record uploaded");

    Ok((StatusCode::ACCEPTED, Json(UploadRecordResponse { key })))
}

/// Download all of the caller's records.
///
/// # Response (200 OK)
///
/// Array of record DTOs, ascending record id. Empty array when the user
/// has no records.
pub async fn download_records(
    State(pool): State<DbPool>,
    Json(request): Json<AccountRequest>,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    if !user_service::authenticate(&pool, &request.user_id, &request.password).await? {
        return Err(AppError::AuthFailed);
    }

    let records = record_service::find_by_user_id(&pool, &request.user_id).await?;
    let response: Vec<RecordResponse> = records.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

/// Delete one record the caller owns.
///
/// # Response
///
/// - **204 No Content**: record and its GPS trace removed
/// - **401**: credentials did not match
/// - **403**: record missing or owned by someone else; the two cases are
///   indistinguishable on purpose
pub async fn delete_record(
    State(pool): State<DbPool>,
    Json(request): Json<DeleteRecordRequest>,
) -> Result<StatusCode, AppError> {
    if !user_service::authenticate(&pool, &request.user_id, &request.password).await? {
        return Err(AppError::AuthFailed);
    }

    // Ownership check before touching anything
    let record = record_service::find_one(&pool, request.record_id).await?;
    match record {
        Some(record) if record.user_id == request.user_id => {
            record_service::delete(&pool, request.record_id).await?;
            tracing::info!(user_id = %request.user_id, record_id = request.record_id, "record deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        _ => Err(AppError::Forbidden),
    }
}
